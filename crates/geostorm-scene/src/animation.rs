//! Per-frame parameter updates.
//!
//! Everything here runs once per displayed frame regardless of effects:
//! spins, texture drift, shader clocks, the sun flicker, and the decaying
//! sun pulse. Effect-driven values (aurora intensity, beam scale) are
//! written by their controllers, not here.

use std::time::Duration;

use glam::Vec2;

use crate::builder::SceneHandles;
use crate::constants::{
    ATMOSPHERE_INTENSITY, AURORA_TIME_STEP, BEAM_TIME_STEP, CLOUD_SPIN, GLOBE_SPIN, PULSE_DECAY,
    PULSE_MAX, SUN_LIGHT_INTENSITY, SUN_OPACITY_BASE, SUN_OPACITY_RATE, SUN_OPACITY_SWING,
    SUN_SPIN, SUN_TEXTURE_DRIFT,
};
use crate::error::SceneError;
use crate::graph::{NodeId, SceneGraph, uniforms};

/// The decaying flare scalar set by the sun wave.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SunPulse(f32);

impl SunPulse {
    /// Set the pulse to `value`. It is clamped on the next decay.
    pub const fn ignite(&mut self, value: f32) {
        self.0 = value;
    }

    /// One frame of exponential decay, clamped to `[0, 2]`.
    pub fn decay(&mut self) -> f32 {
        self.0 = (self.0 * PULSE_DECAY).clamp(0.0, PULSE_MAX);
        self.0
    }

    /// Current value.
    pub const fn value(self) -> f32 {
        self.0
    }
}

/// Sun body opacity at wall-clock time `now`.
#[allow(clippy::cast_possible_truncation)]
pub fn sun_opacity(now: Duration) -> f32 {
    let phase = now.as_secs_f64() * 1000.0 * SUN_OPACITY_RATE;
    SUN_OPACITY_BASE + (phase.sin() as f32) * SUN_OPACITY_SWING
}

/// Advance every per-frame parameter of the scene.
///
/// `beam` is the live beam mesh, if any; a stale handle is skipped.
pub fn advance_frame(
    graph: &mut SceneGraph,
    handles: &SceneHandles,
    beam: Option<NodeId>,
    now: Duration,
) -> Result<(), SceneError> {
    graph.transform_mut(handles.globe)?.rotate_y(GLOBE_SPIN);
    graph.transform_mut(handles.clouds)?.rotate_y(CLOUD_SPIN);
    graph.transform_mut(handles.sun)?.rotate_y(SUN_SPIN);

    let sun = graph.material_mut(handles.sun)?;
    if let Some(texture) = sun.texture.as_mut() {
        texture.offset += Vec2::from(SUN_TEXTURE_DRIFT);
    }
    sun.opacity = sun_opacity(now);

    graph
        .material_mut(handles.aurora)?
        .advance_uniform(uniforms::TIME, AURORA_TIME_STEP);

    if let Some(beam) = beam
        && let Ok(material) = graph.material_mut(beam)
    {
        material.advance_uniform(uniforms::TIME, BEAM_TIME_STEP);
    }

    graph.light_mut(handles.sun_light)?.intensity = SUN_LIGHT_INTENSITY;
    graph
        .material_mut(handles.atmosphere)?
        .set_uniform(uniforms::INTENSITY, ATMOSPHERE_INTENSITY);
    Ok(())
}

//! [`EarthScene`]: the scene graph, effects, HUD, and live graph driven by
//! one frame clock.

use std::collections::VecDeque;
use std::time::Duration;

use geostorm_core::Interval;
use geostorm_types::SensorReading;
use tracing::{debug, info};

use crate::animation::{SunPulse, advance_frame};
use crate::builder::{SceneHandles, build_earth_scene};
use crate::camera::Camera;
use crate::constants::{AURORA_STORM_DURATION, SAMPLE_INTERVAL, SUN_WAVE_PULSE};
use crate::effects::{Aurora, SolarBeam, SunWave, SunWaveStage};
use crate::error::SceneError;
use crate::graph::{NodeId, SceneGraph, uniforms};
use crate::hud::Hud;
use crate::render::Renderer;
use crate::sensor::SyntheticSensor;
use crate::telemetry::LiveGraph;

/// Sun-wave stages remembered for inspection.
const STAGE_LOG_CAPACITY: usize = 32;

/// Construction options for [`EarthScene`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneOptions {
    /// Seed of the synthetic feed.
    pub seed: u64,
    /// Period of the synthetic feed.
    pub sample_interval: Duration,
    /// Whether the synthetic feed runs. Disable when a real sensor feeds
    /// [`EarthScene::apply_reading`].
    pub synthetic_feed: bool,
    /// Field strength (µT) above which a reading starts the sun wave.
    pub storm_threshold_ut: Option<f64>,
    /// Viewport width over height.
    pub aspect: f32,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            seed: 42,
            sample_interval: SAMPLE_INTERVAL,
            synthetic_feed: true,
            storm_threshold_ut: None,
            aspect: 16.0 / 9.0,
        }
    }
}

#[derive(Debug, Clone)]
struct SyntheticFeed {
    sensor: SyntheticSensor,
    interval: Interval,
}

/// The whole viewer state.
///
/// Call [`frame`](Self::frame) once per displayed frame with a monotonic
/// clock. Triggers may be called between frames; their effects advance on
/// the next frame.
#[derive(Debug, Clone)]
pub struct EarthScene {
    graph: SceneGraph,
    handles: SceneHandles,
    camera: Camera,
    beam: SolarBeam,
    aurora: Aurora,
    sun_wave: SunWave,
    pulse: SunPulse,
    hud: Hud,
    live_graph: LiveGraph,
    feed: Option<SyntheticFeed>,
    storm_threshold: Option<f64>,
    stage_log: VecDeque<(Duration, SunWaveStage)>,
}

impl EarthScene {
    /// Build the stock scene with its clocks anchored at `now`.
    pub fn new(options: SceneOptions, now: Duration) -> Result<Self, SceneError> {
        let mut graph = SceneGraph::new();
        let handles = build_earth_scene(&mut graph)?;
        let feed = options.synthetic_feed.then(|| SyntheticFeed {
            sensor: SyntheticSensor::new(options.seed),
            interval: Interval::new(now, options.sample_interval),
        });
        info!(
            nodes = graph.len(),
            synthetic_feed = options.synthetic_feed,
            "Earth scene built"
        );
        Ok(Self {
            graph,
            handles,
            camera: Camera::looking_at_globe(options.aspect),
            beam: SolarBeam::new(),
            aurora: Aurora::new(),
            sun_wave: SunWave::new(),
            pulse: SunPulse::default(),
            hud: Hud::new(),
            live_graph: LiveGraph::new(),
            feed,
            storm_threshold: options.storm_threshold_ut,
            stage_log: VecDeque::with_capacity(STAGE_LOG_CAPACITY),
        })
    }

    /// Advance everything to `now` and draw one frame.
    pub fn frame<R: Renderer + ?Sized>(
        &mut self,
        now: Duration,
        renderer: &mut R,
    ) -> Result<(), SceneError> {
        self.update_timers(now)?;
        advance_frame(&mut self.graph, &self.handles, self.beam.node(), now)?;
        self.pulse.decay();
        renderer.render(&self.graph, &self.camera);
        Ok(())
    }

    /// Apply every effect step and feed sample due at `now`, without the
    /// per-frame animation or a render.
    pub fn update_timers(&mut self, now: Duration) -> Result<(), SceneError> {
        for stage in self.sun_wave.poll(now) {
            self.apply_stage(stage, now)?;
        }
        self.beam.update(now, &mut self.graph);
        let intensity = self.aurora.update(now);
        self.graph
            .material_mut(self.handles.aurora)?
            .set_uniform(uniforms::INTENSITY, intensity);

        let sample = self
            .feed
            .as_mut()
            .and_then(|feed| (feed.interval.due(now) > 0).then(|| feed.sensor.sample()));
        if let Some(raw) = sample {
            self.record_sample(raw);
        }
        Ok(())
    }

    fn apply_stage(&mut self, stage: SunWaveStage, now: Duration) -> Result<(), SceneError> {
        debug!(%stage, at = ?now, "Sun wave stage");
        if self.stage_log.len() >= STAGE_LOG_CAPACITY {
            self.stage_log.pop_front();
        }
        self.stage_log.push_back((now, stage));

        match stage {
            SunWaveStage::Charge => {
                self.pulse.ignite(SUN_WAVE_PULSE);
                self.hud.set_sun_wave_disabled(true);
            }
            SunWaveStage::FireBeam => {
                self.fire_solar_beam(now)?;
            }
            SunWaveStage::RaiseAlert => self.hud.set_alert(true),
            SunWaveStage::Aurora => {
                self.aurora.trigger(now, AURORA_STORM_DURATION);
            }
            SunWaveStage::Cleanup => {
                self.beam.shrink(now);
                self.hud.set_alert(false);
                self.hud.set_sun_wave_disabled(false);
            }
        }
        Ok(())
    }

    /// Start the sun wave. The charge stage is applied at once. Returns
    /// `false` while a previous wave is still running.
    pub fn trigger_sun_wave(&mut self, now: Duration) -> Result<bool, SceneError> {
        if !self.sun_wave.trigger(now) {
            return Ok(false);
        }
        for stage in self.sun_wave.poll(now) {
            self.apply_stage(stage, now)?;
        }
        Ok(true)
    }

    /// Abort a running sun wave and run its cleanup now. Returns whether a
    /// wave was running.
    pub fn cancel_sun_wave(&mut self, now: Duration) -> Result<bool, SceneError> {
        if !self.sun_wave.cancel() {
            return Ok(false);
        }
        info!("Sun wave cancelled");
        self.apply_stage(SunWaveStage::Cleanup, now)?;
        Ok(true)
    }

    /// Fade the aurora in for `duration`. Returns `false` if it is already
    /// showing.
    pub fn trigger_aurora(&mut self, now: Duration, duration: Duration) -> bool {
        self.aurora.trigger(now, duration)
    }

    /// Fire a beam from the sun at the globe, replacing any existing beam.
    pub fn fire_solar_beam(&mut self, now: Duration) -> Result<NodeId, SceneError> {
        self.beam
            .fire(now, &mut self.graph, self.handles.sun, self.handles.globe)
    }

    /// Start collapsing the beam. Returns `false` if there is none.
    pub fn shrink_solar_beam(&mut self, now: Duration) -> bool {
        self.beam.shrink(now)
    }

    /// The live-data panel click: expand or collapse the graph. Returns
    /// whether the live view is now showing.
    pub fn toggle_live_view(&mut self) -> bool {
        let expanded = self.live_graph.toggle();
        self.hud.set_live_mode(expanded);
        debug!(expanded, "Live view toggled");
        expanded
    }

    /// Show a raw field strength and feed it to the graph.
    pub fn record_sample(&mut self, micro_tesla: f64) {
        self.hud.show_strength(micro_tesla);
        self.live_graph.update(micro_tesla);
    }

    /// Apply a sensor reading. Returns whether it started a sun wave.
    pub fn apply_reading(
        &mut self,
        reading: &SensorReading,
        now: Duration,
    ) -> Result<bool, SceneError> {
        self.hud.show_reading(reading);
        self.live_graph.update(reading.field_strength);
        match self.storm_threshold {
            Some(threshold) if reading.field_strength > threshold => {
                info!(
                    field_strength = reading.field_strength,
                    threshold, "Storm threshold exceeded"
                );
                self.trigger_sun_wave(now)
            }
            _ => Ok(false),
        }
    }

    /// Resize the viewport.
    pub const fn set_aspect(&mut self, aspect: f32) {
        self.camera.aspect = aspect;
    }

    /// The scene graph.
    pub const fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Handles to the permanent nodes.
    pub const fn handles(&self) -> &SceneHandles {
        &self.handles
    }

    /// The camera.
    pub const fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Overlay state.
    pub const fn hud(&self) -> &Hud {
        &self.hud
    }

    /// Overlay state, for the theory and back buttons.
    pub const fn hud_mut(&mut self) -> &mut Hud {
        &mut self.hud
    }

    /// The live graph panel.
    pub const fn live_graph(&self) -> &LiveGraph {
        &self.live_graph
    }

    /// The aurora controller.
    pub const fn aurora(&self) -> &Aurora {
        &self.aurora
    }

    /// The beam controller.
    pub const fn beam(&self) -> &SolarBeam {
        &self.beam
    }

    /// The sun-wave sequencer.
    pub const fn sun_wave(&self) -> &SunWave {
        &self.sun_wave
    }

    /// Current sun pulse.
    pub const fn pulse(&self) -> f32 {
        self.pulse.value()
    }

    /// Recently applied sun-wave stages with the time each was applied.
    pub fn stage_log(&self) -> impl Iterator<Item = (Duration, SunWaveStage)> + '_ {
        self.stage_log.iter().copied()
    }
}

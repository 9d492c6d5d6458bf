//! Solar beam: a transient box stretched from the sun toward the globe.
//!
//! Firing builds a box of fixed cross-section whose length is the
//! sun–globe distance, with its local origin at the sun-facing end, rotated
//! from +Z onto the sun→globe direction and placed just outside the sun's
//! surface. The length axis then grows from near zero to full length; a
//! later shrink collapses a cross axis and removes the mesh.

use std::time::Duration;

use geostorm_core::Interval;
use glam::{Quat, Vec3};
use tracing::debug;

use crate::constants::{
    BEAM_CROSS_SECTION, BEAM_GROW_STEP, BEAM_INITIAL_SCALE, BEAM_MIN_SCALE, BEAM_SHRINK_STEP,
    BEAM_SURFACE_GAP, BEAM_TICK,
};
use crate::effects::EffectPhase;
use crate::error::SceneError;
use crate::graph::{
    Color, Geometry, Material, MaterialKind, Node, NodeId, SceneGraph, ShaderProgram, Transform,
    uniforms,
};

/// Placement of a beam between two bodies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamGeometry {
    /// Unit vector from the sun to the globe.
    pub direction: Vec3,
    /// Distance between the two body centres.
    pub length: f32,
    /// Beam start, just outside the sun's surface.
    pub start: Vec3,
    /// Rotation taking +Z onto `direction`.
    pub rotation: Quat,
}

impl BeamGeometry {
    /// Compute the beam from the sun centre, the globe centre, and the sun
    /// radius.
    pub fn between(sun: Vec3, globe: Vec3, sun_radius: f32) -> Result<Self, SceneError> {
        let offset = globe - sun;
        let length = offset.length();
        let direction = offset.try_normalize().ok_or(SceneError::DegenerateBeam)?;
        Ok(Self {
            direction,
            length,
            start: sun + direction * (sun_radius + BEAM_SURFACE_GAP),
            rotation: Quat::from_rotation_arc(Vec3::Z, direction),
        })
    }

    /// Box geometry with its origin at the sun-facing end.
    pub fn geometry(&self) -> Geometry {
        Geometry::Box {
            width: BEAM_CROSS_SECTION,
            height: BEAM_CROSS_SECTION,
            depth: self.length,
            offset: Vec3::new(0.0, 0.0, self.length / 2.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum BeamState {
    Idle,
    Growing(Interval),
    Holding,
    Shrinking(Interval),
}

/// Controller for the single solar beam.
///
/// At most one beam exists. Firing while one is present removes the old
/// mesh first.
#[derive(Debug, Clone, PartialEq)]
pub struct SolarBeam {
    node: Option<NodeId>,
    state: BeamState,
}

impl Default for SolarBeam {
    fn default() -> Self {
        Self::new()
    }
}

impl SolarBeam {
    /// A controller with no beam.
    pub const fn new() -> Self {
        Self {
            node: None,
            state: BeamState::Idle,
        }
    }

    /// Handle of the live beam mesh.
    pub const fn node(&self) -> Option<NodeId> {
        self.node
    }

    /// Whether a beam mesh is in the scene.
    pub const fn is_active(&self) -> bool {
        self.node.is_some()
    }

    /// Lifecycle phase.
    pub const fn phase(&self) -> EffectPhase {
        match self.state {
            BeamState::Idle => EffectPhase::Idle,
            BeamState::Growing(_) | BeamState::Holding => EffectPhase::Running,
            BeamState::Shrinking(_) => EffectPhase::Cooling,
        }
    }

    /// Build a beam from `sun` toward `globe` and start growing it.
    ///
    /// The sun radius is read from the sun's sphere geometry.
    pub fn fire(
        &mut self,
        now: Duration,
        graph: &mut SceneGraph,
        sun: NodeId,
        globe: NodeId,
    ) -> Result<NodeId, SceneError> {
        let sun_radius = match graph.get(sun)?.as_mesh().map(|mesh| mesh.geometry) {
            Some(Geometry::Sphere { radius, .. }) => radius,
            _ => return Err(SceneError::NotAMesh(sun)),
        };
        let placement = BeamGeometry::between(
            graph.world_position(sun)?,
            graph.world_position(globe)?,
            sun_radius,
        )?;

        if let Some(previous) = self.node.take() {
            debug!(beam = %previous, "Replacing active solar beam");
            graph.remove(previous);
        }

        let mut material =
            Material::new(MaterialKind::Shader(ShaderProgram::SolarBeam), Color(0x00ff_aa33));
        material.transparent = true;
        material.additive = true;
        material.set_uniform(uniforms::TIME, 0.0);

        let transform = Transform {
            position: placement.start,
            rotation: placement.rotation,
            scale: Vec3::new(1.0, 1.0, BEAM_INITIAL_SCALE),
        };
        let node = graph.add(Node::mesh("solar-beam", placement.geometry(), material, transform));
        self.node = Some(node);
        self.state = BeamState::Growing(Interval::new(now, BEAM_TICK));
        debug!(beam = %node, length = placement.length, "Solar beam fired");
        Ok(node)
    }

    /// Start collapsing the beam. Returns `false` if there is no beam or it
    /// is already shrinking.
    pub fn shrink(&mut self, now: Duration) -> bool {
        if self.node.is_none() || matches!(self.state, BeamState::Shrinking(_)) {
            return false;
        }
        self.state = BeamState::Shrinking(Interval::new(now, BEAM_TICK));
        true
    }

    /// Remove the beam immediately.
    pub fn clear(&mut self, graph: &mut SceneGraph) {
        if let Some(node) = self.node.take() {
            graph.remove(node);
        }
        self.state = BeamState::Idle;
    }

    /// Apply every grow or shrink step due at `now`.
    pub fn update(&mut self, now: Duration, graph: &mut SceneGraph) {
        let Some(node) = self.node else {
            self.state = BeamState::Idle;
            return;
        };
        let Ok(transform) = graph.transform_mut(node) else {
            // Removed from under us.
            self.node = None;
            self.state = BeamState::Idle;
            return;
        };

        match &mut self.state {
            BeamState::Growing(interval) => {
                for _ in 0..interval.due(now) {
                    transform.scale.z += BEAM_GROW_STEP;
                    if transform.scale.z >= 1.0 {
                        transform.scale.z = 1.0;
                        self.state = BeamState::Holding;
                        break;
                    }
                }
            }
            BeamState::Shrinking(interval) => {
                for _ in 0..interval.due(now) {
                    transform.scale.x -= BEAM_SHRINK_STEP;
                    if transform.scale.x <= BEAM_MIN_SCALE {
                        graph.remove(node);
                        self.node = None;
                        self.state = BeamState::Idle;
                        debug!(beam = %node, "Solar beam removed");
                        break;
                    }
                }
            }
            BeamState::Idle | BeamState::Holding => {}
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::builder::build_earth_scene;
    use crate::constants::SUN_RADIUS;

    const fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn geometry_spans_sun_to_globe() {
        let sun = Vec3::new(2.8, 0.8, -1.0);
        let globe = Vec3::ZERO;
        let beam = BeamGeometry::between(sun, globe, 0.35).unwrap();

        assert!((beam.length - sun.distance(globe)).abs() < 1e-6);
        assert!((beam.start.distance(sun) - (0.35 + 0.01)).abs() < 1e-6);
        let along = (beam.start - sun).normalize();
        assert!(along.abs_diff_eq(beam.direction, 1e-6));
        assert!((beam.rotation * Vec3::Z).abs_diff_eq(beam.direction, 1e-5));
    }

    #[test]
    fn coincident_bodies_are_rejected() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(BeamGeometry::between(p, p, 0.35), Err(SceneError::DegenerateBeam));
    }

    #[test]
    fn box_origin_sits_at_sun_end() {
        let beam = BeamGeometry::between(Vec3::ZERO, Vec3::new(0.0, 0.0, 4.0), 0.5).unwrap();
        let Geometry::Box { depth, offset, .. } = beam.geometry() else {
            panic!("beam geometry is a box");
        };
        assert!((depth - 4.0).abs() < 1e-6);
        assert!((offset.z - 2.0).abs() < 1e-6);
    }

    #[test]
    fn beam_grows_to_full_length_then_holds() {
        let mut graph = SceneGraph::new();
        let handles = build_earth_scene(&mut graph).unwrap();
        let mut beam = SolarBeam::new();
        let node = beam.fire(ms(0), &mut graph, handles.sun, handles.globe).unwrap();

        let start = graph.get(node).unwrap().transform;
        let expected = graph.world_position(handles.sun).unwrap().distance(Vec3::ZERO);
        match graph.get(node).unwrap().as_mesh().unwrap().geometry {
            Geometry::Box { depth, .. } => assert!((depth - expected).abs() < 1e-5),
            Geometry::Sphere { .. } => panic!("beam geometry is a box"),
        }
        let sun = graph.world_position(handles.sun).unwrap();
        assert!((start.position.distance(sun) - (SUN_RADIUS + 0.01)).abs() < 1e-5);

        let mut last = start.scale.z;
        for tick in 1..=20 {
            beam.update(ms(tick * 16), &mut graph);
            let z = graph.get(node).unwrap().transform.scale.z;
            assert!(z >= last);
            last = z;
        }
        assert!((last - 1.0).abs() < f32::EPSILON);
        assert_eq!(beam.phase(), EffectPhase::Running);
    }

    #[test]
    fn shrink_removes_the_mesh() {
        let mut graph = SceneGraph::new();
        let handles = build_earth_scene(&mut graph).unwrap();
        let before = graph.len();
        let mut beam = SolarBeam::new();
        let node = beam.fire(ms(0), &mut graph, handles.sun, handles.globe).unwrap();
        beam.update(ms(400), &mut graph);

        assert!(beam.shrink(ms(400)));
        assert!(!beam.shrink(ms(401)));
        assert_eq!(beam.phase(), EffectPhase::Cooling);

        // 1.0 → ≤ 0.01 in steps of 0.05 takes 20 ticks.
        beam.update(ms(400 + 16 * 19), &mut graph);
        assert!(graph.contains(node));
        beam.update(ms(400 + 16 * 20), &mut graph);
        assert!(!graph.contains(node));
        assert_eq!(graph.len(), before);
        assert!(!beam.is_active());
        assert_eq!(beam.phase(), EffectPhase::Idle);
    }

    #[test]
    fn shrink_without_beam_is_a_no_op() {
        let mut beam = SolarBeam::new();
        assert!(!beam.shrink(ms(0)));
    }

    #[test]
    fn refiring_replaces_the_previous_beam() {
        let mut graph = SceneGraph::new();
        let handles = build_earth_scene(&mut graph).unwrap();
        let mut beam = SolarBeam::new();
        let first = beam.fire(ms(0), &mut graph, handles.sun, handles.globe).unwrap();
        beam.shrink(ms(100));
        let second = beam.fire(ms(120), &mut graph, handles.sun, handles.globe).unwrap();
        assert!(!graph.contains(first));
        assert!(graph.contains(second));
        assert_eq!(beam.phase(), EffectPhase::Running);
    }

    #[test]
    fn externally_removed_beam_resets_controller() {
        let mut graph = SceneGraph::new();
        let handles = build_earth_scene(&mut graph).unwrap();
        let mut beam = SolarBeam::new();
        let node = beam.fire(ms(0), &mut graph, handles.sun, handles.globe).unwrap();
        graph.remove(node);
        beam.update(ms(16), &mut graph);
        assert!(!beam.is_active());
    }
}

//! Headless renderer that reports what a real backend would draw.

use geostorm_scene::{Camera, Renderer, SceneGraph};
use tracing::debug;

/// Counts frames and logs a scene summary every `log_every` frames.
#[derive(Debug)]
pub struct SummaryRenderer {
    frames: u64,
    log_every: u64,
    last_visible: usize,
}

impl SummaryRenderer {
    /// A renderer that logs once per `log_every` frames (at least one).
    pub fn new(log_every: u64) -> Self {
        Self {
            frames: 0,
            log_every: log_every.max(1),
            last_visible: 0,
        }
    }

    /// Frames rendered so far.
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Nodes whose origin fell inside the view volume on the last frame.
    pub const fn last_visible(&self) -> usize {
        self.last_visible
    }
}

impl Renderer for SummaryRenderer {
    fn render(&mut self, graph: &SceneGraph, camera: &Camera) {
        self.frames = self.frames.saturating_add(1);

        let view_projection = camera.projection_matrix() * camera.view_matrix();
        self.last_visible = graph
            .iter()
            .filter(|&(id, _)| {
                graph.world_position(id).is_ok_and(|position| {
                    let ndc = view_projection.project_point3(position);
                    ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0 && (0.0..=1.0).contains(&ndc.z)
                })
            })
            .count();

        if self.frames.checked_rem(self.log_every) == Some(0) {
            debug!(
                frame = self.frames,
                nodes = graph.len(),
                visible = self.last_visible,
                "Frame rendered"
            );
        }
    }
}

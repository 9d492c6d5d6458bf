//! The rendering backend seam.

use crate::camera::Camera;
use crate::graph::SceneGraph;

/// Draws one frame of the scene.
///
/// Called once per [`EarthScene::frame`](crate::EarthScene::frame) after
/// all per-frame and effect updates have been applied.
pub trait Renderer {
    /// Render `graph` as seen from `camera`.
    fn render(&mut self, graph: &SceneGraph, camera: &Camera);
}

/// A renderer that draws nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _graph: &SceneGraph, _camera: &Camera) {}
}

//! Error types for the scene crate.

use crate::graph::NodeId;

/// Errors raised while building or mutating the scene.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    /// A node handle does not refer to a node in the graph.
    #[error("scene node {0} not found")]
    NodeNotFound(NodeId),

    /// The node exists but is not a mesh (e.g. it is a light).
    #[error("scene node {0} is not a mesh")]
    NotAMesh(NodeId),

    /// The node exists but is not a light.
    #[error("scene node {0} is not a light")]
    NotALight(NodeId),

    /// The sun and globe coincide, so the beam has no direction.
    #[error("beam endpoints coincide")]
    DegenerateBeam,
}

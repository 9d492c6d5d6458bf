//! Scene graph: renderable nodes with transforms, materials, and lights.
//!
//! Nodes live in a flat map keyed by [`NodeId`]; a node may name a parent
//! whose transform it inherits. The graph owns every node for its whole
//! lifetime except transient ones (the solar beam), which are added and
//! removed by their effect controller.

use std::collections::BTreeMap;
use std::fmt;

use glam::{Mat4, Quat, Vec2, Vec3};

use crate::error::SceneError;

/// Handle to a node in a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A 24-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    /// Red, green, and blue channels in `[0, 1]`.
    pub fn rgb(self) -> Vec3 {
        let channel =
            |shift: u32| f32::from(u8::try_from((self.0 >> shift) & 0xff).unwrap_or(0)) / 255.0;
        Vec3::new(channel(16), channel(8), channel(0))
    }
}

/// Position, orientation, and scale of a node relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation.
    pub position: Vec3,
    /// Orientation.
    pub rotation: Quat,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Transform {
    /// A transform at `position` with no rotation and unit scale.
    pub const fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    /// Spin about the local Y axis.
    pub fn rotate_y(&mut self, angle: f32) {
        self.rotation = (self.rotation * Quat::from_rotation_y(angle)).normalize();
    }

    /// Local-to-parent matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

/// Mesh shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    /// A UV sphere centred on the origin.
    Sphere {
        /// Sphere radius.
        radius: f32,
        /// Width and height segment count.
        segments: u32,
    },
    /// An axis-aligned box, shifted so its local origin need not be the
    /// centre.
    Box {
        /// Extent along X.
        width: f32,
        /// Extent along Y.
        height: f32,
        /// Extent along Z.
        depth: f32,
        /// Translation baked into the vertices.
        offset: Vec3,
    },
}

/// Which shader a [`MaterialKind::Shader`] material runs. The program
/// sources belong to the rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderProgram {
    /// Rim-lit glow on the day side of the atmosphere shell.
    AtmosphereGlow,
    /// Latitude-banded, wave-modulated aurora.
    Aurora,
    /// Flowing energy along the solar beam.
    SolarBeam,
}

/// Shading model of a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    /// Physically based, lit.
    Standard,
    /// Unlit flat colour.
    Basic,
    /// Custom shader program fed by [`Material::uniforms`].
    Shader(ShaderProgram),
}

/// Which faces are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    /// Outward faces.
    #[default]
    Front,
    /// Inward faces (used for glow shells).
    Back,
}

/// A texture reference with a scrolling UV offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    /// Asset path relative to the static root.
    pub path: String,
    /// UV offset, advanced for scrolling surfaces.
    pub offset: Vec2,
}

impl Texture {
    /// A texture with no offset.
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_owned(),
            offset: Vec2::ZERO,
        }
    }
}

/// Shader uniform names.
pub mod uniforms {
    /// Shader clock.
    pub const TIME: &str = "time";
    /// Overall effect intensity.
    pub const INTENSITY: &str = "intensity";
    /// Rim falloff exponent.
    pub const POWER: &str = "power";
}

/// Surface appearance of a mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Shading model.
    pub kind: MaterialKind,
    /// Base (or glow) colour.
    pub color: Color,
    /// Emissive colour and strength, if any.
    pub emissive: Option<(Color, f32)>,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
    /// Whether opacity is honoured.
    pub transparent: bool,
    /// Additive blending instead of alpha-over.
    pub additive: bool,
    /// Whether the mesh writes depth.
    pub depth_write: bool,
    /// Faces drawn.
    pub side: Side,
    /// Colour map.
    pub texture: Option<Texture>,
    /// Scalar shader uniforms by name.
    pub uniforms: BTreeMap<&'static str, f32>,
}

impl Material {
    /// An opaque material of the given kind and colour.
    pub const fn new(kind: MaterialKind, color: Color) -> Self {
        Self {
            kind,
            color,
            emissive: None,
            opacity: 1.0,
            transparent: false,
            additive: false,
            depth_write: true,
            side: Side::Front,
            texture: None,
            uniforms: BTreeMap::new(),
        }
    }

    /// Read a uniform, defaulting to zero.
    pub fn uniform(&self, name: &str) -> f32 {
        self.uniforms.get(name).copied().unwrap_or(0.0)
    }

    /// Set a uniform.
    pub fn set_uniform(&mut self, name: &'static str, value: f32) {
        self.uniforms.insert(name, value);
    }

    /// Add `delta` to a uniform, creating it at zero if absent.
    pub fn advance_uniform(&mut self, name: &'static str, delta: f32) {
        let slot = self.uniforms.entry(name).or_insert(0.0);
        *slot += delta;
    }
}

/// A drawable: geometry plus material.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Shape.
    pub geometry: Geometry,
    /// Appearance.
    pub material: Material,
    /// Draw order among transparent meshes (higher draws later).
    pub render_order: i32,
}

/// Kinds of light source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightKind {
    /// Uniform fill.
    Ambient,
    /// Parallel rays from the node's position toward the origin.
    Directional,
    /// Omnidirectional from the node's position.
    Point,
    /// Sky/ground gradient fill.
    Hemisphere {
        /// Ground colour.
        ground: Color,
    },
}

/// A light source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// Kind of light.
    pub kind: LightKind,
    /// Light (or sky) colour.
    pub color: Color,
    /// Intensity.
    pub intensity: f32,
}

/// What a node contributes to the frame.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A drawable mesh.
    Mesh(Mesh),
    /// A light source.
    Light(Light),
}

/// One entry in the scene graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Debug name.
    pub name: String,
    /// Mesh or light.
    pub kind: NodeKind,
    /// Transform relative to the parent (or the world).
    pub transform: Transform,
    /// Parent node, if any.
    pub parent: Option<NodeId>,
}

impl Node {
    /// A root-level mesh node.
    pub fn mesh(name: &str, geometry: Geometry, material: Material, transform: Transform) -> Self {
        Self {
            name: name.to_owned(),
            kind: NodeKind::Mesh(Mesh {
                geometry,
                material,
                render_order: 0,
            }),
            transform,
            parent: None,
        }
    }

    /// A root-level light node.
    pub fn light(name: &str, light: Light, position: Vec3) -> Self {
        Self {
            name: name.to_owned(),
            kind: NodeKind::Light(light),
            transform: Transform::at(position),
            parent: None,
        }
    }

    /// The mesh payload, if this is a mesh.
    pub const fn as_mesh(&self) -> Option<&Mesh> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            NodeKind::Light(_) => None,
        }
    }

    /// The light payload, if this is a light.
    pub const fn as_light(&self) -> Option<&Light> {
        match &self.kind {
            NodeKind::Light(light) => Some(light),
            NodeKind::Mesh(_) => None,
        }
    }
}

/// The top-level scene container.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: BTreeMap<NodeId, Node>,
    next_id: u32,
}

impl SceneGraph {
    /// An empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node at the root and return its handle.
    pub fn add(&mut self, mut node: Node) -> NodeId {
        node.parent = None;
        self.insert(node)
    }

    /// Add a node under `parent`.
    pub fn add_child(&mut self, parent: NodeId, mut node: Node) -> Result<NodeId, SceneError> {
        if !self.nodes.contains_key(&parent) {
            return Err(SceneError::NodeNotFound(parent));
        }
        node.parent = Some(parent);
        Ok(self.insert(node))
    }

    fn insert(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.nodes.insert(id, node);
        id
    }

    /// Remove a node and everything parented under it. Returns the node
    /// itself, or `None` if it was not present.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        let removed = self.nodes.remove(&id)?;
        let children: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.parent == Some(id))
            .map(|(child, _)| *child)
            .collect();
        for child in children {
            self.remove(child);
        }
        Some(removed)
    }

    /// Whether the handle refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node.
    pub fn get(&self, id: NodeId) -> Result<&Node, SceneError> {
        self.nodes.get(&id).ok_or(SceneError::NodeNotFound(id))
    }

    /// Look up a node mutably.
    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut Node, SceneError> {
        self.nodes.get_mut(&id).ok_or(SceneError::NodeNotFound(id))
    }

    /// Mutable transform of a node.
    pub fn transform_mut(&mut self, id: NodeId) -> Result<&mut Transform, SceneError> {
        Ok(&mut self.get_mut(id)?.transform)
    }

    /// Mutable mesh payload of a node.
    pub fn mesh_mut(&mut self, id: NodeId) -> Result<&mut Mesh, SceneError> {
        match &mut self.get_mut(id)?.kind {
            NodeKind::Mesh(mesh) => Ok(mesh),
            NodeKind::Light(_) => Err(SceneError::NotAMesh(id)),
        }
    }

    /// Mutable material of a mesh node.
    pub fn material_mut(&mut self, id: NodeId) -> Result<&mut Material, SceneError> {
        Ok(&mut self.mesh_mut(id)?.material)
    }

    /// Mutable light payload of a node.
    pub fn light_mut(&mut self, id: NodeId) -> Result<&mut Light, SceneError> {
        match &mut self.get_mut(id)?.kind {
            NodeKind::Light(light) => Ok(light),
            NodeKind::Mesh(_) => Err(SceneError::NotALight(id)),
        }
    }

    /// Iterate nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    /// Local-to-world matrix of a node, composing its parent chain.
    pub fn world_matrix(&self, id: NodeId) -> Result<Mat4, SceneError> {
        let mut node = self.get(id)?;
        let mut matrix = node.transform.matrix();
        // A parent chain can be no longer than the graph.
        for _ in 0..self.nodes.len() {
            let Some(parent) = node.parent else {
                break;
            };
            node = self.get(parent)?;
            matrix = node.transform.matrix() * matrix;
        }
        Ok(matrix)
    }

    /// World-space origin of a node.
    pub fn world_position(&self, id: NodeId) -> Result<Vec3, SceneError> {
        Ok(self.world_matrix(id)?.transform_point3(Vec3::ZERO))
    }
}

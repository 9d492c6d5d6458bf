//! Construction of the stock Earth scene.
//!
//! Builds the globe, cloud shell, atmosphere glow, sun (with its glow
//! child), aurora shell, and the light rig, and returns handles to the
//! nodes the animation and effects touch.

use glam::Vec3;

use crate::constants::{
    ATMOSPHERE_INTENSITY, ATMOSPHERE_RADIUS, AURORA_RADIUS, CLOUD_RADIUS, EARTH_SEGMENTS,
    GLOBE_RADIUS, SUN_LIGHT_INTENSITY, SUN_POSITION, SUN_RADIUS, SUN_SEGMENTS,
};
use crate::error::SceneError;
use crate::graph::{
    Color, Geometry, Light, LightKind, Material, MaterialKind, Node, NodeId, SceneGraph,
    ShaderProgram, Side, Texture, Transform, uniforms,
};

/// Globe colour map.
pub const EARTH_DAY_TEXTURE: &str = "earth_day.jpg";
/// Cloud alpha map.
pub const EARTH_CLOUDS_TEXTURE: &str = "earth_clouds.png";
/// Sun surface map.
pub const SUN_SURFACE_TEXTURE: &str = "textures/sun_surface.jpg";

/// Handles to the permanent nodes of the Earth scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneHandles {
    /// The textured globe.
    pub globe: NodeId,
    /// The cloud shell.
    pub clouds: NodeId,
    /// The atmosphere glow shell.
    pub atmosphere: NodeId,
    /// The sun body.
    pub sun: NodeId,
    /// The additive glow parented to the sun.
    pub sun_glow: NodeId,
    /// The aurora shell.
    pub aurora: NodeId,
    /// The directional key light.
    pub sun_light: NodeId,
}

fn sphere(radius: f32, segments: u32) -> Geometry {
    Geometry::Sphere { radius, segments }
}

/// Populate `graph` with the Earth scene.
pub fn build_earth_scene(graph: &mut SceneGraph) -> Result<SceneHandles, SceneError> {
    let mut globe_material = Material::new(MaterialKind::Standard, Color(0x00ff_ffff));
    globe_material.texture = Some(Texture::new(EARTH_DAY_TEXTURE));
    let globe = graph.add(Node::mesh(
        "globe",
        sphere(GLOBE_RADIUS, EARTH_SEGMENTS),
        globe_material,
        Transform::default(),
    ));

    let mut cloud_material = Material::new(MaterialKind::Standard, Color(0x00ff_ffff));
    cloud_material.texture = Some(Texture::new(EARTH_CLOUDS_TEXTURE));
    cloud_material.transparent = true;
    cloud_material.opacity = 0.9;
    cloud_material.depth_write = false;
    cloud_material.emissive = Some((Color(0x0022_2222), 1.0));
    let clouds = graph.add(Node::mesh(
        "clouds",
        sphere(CLOUD_RADIUS, EARTH_SEGMENTS),
        cloud_material,
        Transform::default(),
    ));
    graph.mesh_mut(clouds)?.render_order = 1;

    let mut atmosphere_material = Material::new(
        MaterialKind::Shader(ShaderProgram::AtmosphereGlow),
        Color(0x004d_a6ff),
    );
    atmosphere_material.transparent = true;
    atmosphere_material.additive = true;
    atmosphere_material.side = Side::Back;
    atmosphere_material.set_uniform(uniforms::INTENSITY, ATMOSPHERE_INTENSITY);
    atmosphere_material.set_uniform(uniforms::POWER, 2.5);
    let atmosphere = graph.add(Node::mesh(
        "atmosphere",
        sphere(ATMOSPHERE_RADIUS, EARTH_SEGMENTS),
        atmosphere_material,
        Transform::default(),
    ));

    let mut sun_material = Material::new(MaterialKind::Standard, Color(0x00ff_ffff));
    sun_material.texture = Some(Texture::new(SUN_SURFACE_TEXTURE));
    sun_material.emissive = Some((Color(0x00ff_5500), 1.2));
    let [sx, sy, sz] = SUN_POSITION;
    let sun = graph.add(Node::mesh(
        "sun",
        sphere(SUN_RADIUS, SUN_SEGMENTS),
        sun_material,
        Transform::at(Vec3::new(sx, sy, sz)),
    ));

    let mut glow_material = Material::new(MaterialKind::Basic, Color(0x00ff_3300));
    glow_material.transparent = true;
    glow_material.opacity = 0.1;
    let sun_glow = graph.add_child(
        sun,
        Node::mesh(
            "sun-glow",
            sphere(SUN_RADIUS, SUN_SEGMENTS),
            glow_material,
            Transform::default(),
        ),
    )?;

    let mut aurora_material =
        Material::new(MaterialKind::Shader(ShaderProgram::Aurora), Color(0x0066_ffcc));
    aurora_material.transparent = true;
    aurora_material.additive = true;
    aurora_material.depth_write = false;
    aurora_material.set_uniform(uniforms::TIME, 0.0);
    aurora_material.set_uniform(uniforms::INTENSITY, 0.0);
    let aurora = graph.add(Node::mesh(
        "aurora",
        sphere(AURORA_RADIUS, EARTH_SEGMENTS),
        aurora_material,
        Transform::default(),
    ));

    graph.add(Node::light(
        "sun-point",
        Light {
            kind: LightKind::Point,
            color: Color(0x00ff_ffff),
            intensity: 2.0,
        },
        Vec3::new(sx, sy, 1.0),
    ));
    graph.add(Node::light(
        "ambient",
        Light {
            kind: LightKind::Ambient,
            color: Color(0x0005_0505),
            intensity: 1.0,
        },
        Vec3::ZERO,
    ));
    let sun_light = graph.add(Node::light(
        "key",
        Light {
            kind: LightKind::Directional,
            color: Color(0x00ff_ffff),
            intensity: SUN_LIGHT_INTENSITY,
        },
        Vec3::new(10.0, 4.0, 6.0),
    ));
    graph.add(Node::light(
        "sky",
        Light {
            kind: LightKind::Hemisphere {
                ground: Color(0x0002_030a),
            },
            color: Color(0x0088_ccee),
            intensity: 0.35,
        },
        Vec3::ZERO,
    ));

    Ok(SceneHandles {
        globe,
        clouds,
        atmosphere,
        sun,
        sun_glow,
        aurora,
        sun_light,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn builds_every_body_and_light() {
        let mut graph = SceneGraph::new();
        let handles = build_earth_scene(&mut graph).unwrap();
        // Six meshes and four lights.
        assert_eq!(graph.len(), 10);
        let meshes = graph.iter().filter(|(_, n)| n.as_mesh().is_some()).count();
        assert_eq!(meshes, 6);

        let sun = graph.world_position(handles.sun).unwrap();
        assert!(sun.abs_diff_eq(Vec3::new(2.8, 0.8, -1.0), 1e-6));
        let glow = graph.world_position(handles.sun_glow).unwrap();
        assert!(glow.abs_diff_eq(sun, 1e-6));
    }

    #[test]
    fn aurora_starts_invisible() {
        let mut graph = SceneGraph::new();
        let handles = build_earth_scene(&mut graph).unwrap();
        let aurora = graph.material_mut(handles.aurora).unwrap();
        assert!(aurora.uniform(uniforms::INTENSITY).abs() < f32::EPSILON);
    }
}

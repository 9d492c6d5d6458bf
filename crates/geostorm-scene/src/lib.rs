//! Earth scene model and visual-effect sequencing for Geostorm.
//!
//! This crate owns everything the viewer draws, independent of any
//! rendering backend: the scene graph (globe, cloud shell, atmosphere,
//! sun, aurora shell, transient solar beam), the per-frame animation, the
//! timed effects, and the live magnetic-field graph. A backend implements
//! [`Renderer`] and [`Canvas2d`] and is handed the state each frame.
//!
//! # Architecture
//!
//! All mutation happens on the thread that calls [`EarthScene::frame`].
//! Effects are explicit state machines polled against the frame clock
//! instead of free-running timers, so there is no shared mutable state and
//! every sequence can be cancelled:
//!
//! - [`SolarBeam`] grows a beam from the sun toward the globe, then
//!   shrinks and removes it.
//! - [`Aurora`] fades the aurora shell in, holds, and fades it out.
//! - [`SunWave`] scripts the full storm presentation on a
//!   [`Timeline`](geostorm_core::Timeline) behind a single latch.
//!
//! # Modules
//!
//! - [`graph`] -- Scene graph nodes, transforms, materials, lights
//! - [`builder`] -- Construction of the stock Earth scene
//! - [`camera`] -- Perspective camera
//! - [`effects`] -- Beam, aurora, and sun-wave controllers
//! - [`animation`] -- Per-frame parameter updates and the sun pulse
//! - [`telemetry`] -- Smoothed magnetic history and its 2D plot
//! - [`sensor`] -- Synthetic magnetic samples
//! - [`hud`] -- Readouts and overlay flags the page displays
//! - [`render`] -- The rendering backend seam
//! - [`scene`] -- [`EarthScene`], which wires everything together

pub mod animation;
pub mod builder;
pub mod camera;
pub mod constants;
pub mod effects;
pub mod error;
pub mod graph;
pub mod hud;
pub mod render;
pub mod scene;
pub mod sensor;
pub mod telemetry;

pub use camera::Camera;
pub use effects::{Aurora, BeamGeometry, EffectPhase, SolarBeam, SunWave, SunWaveStage};
pub use error::SceneError;
pub use graph::{NodeId, SceneGraph};
pub use hud::Hud;
pub use render::Renderer;
pub use scene::{EarthScene, SceneOptions};
pub use telemetry::{Canvas2d, LiveGraph, MagneticHistory, PathCommand, PathRecorder};

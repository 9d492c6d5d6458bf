//! Tuning constants for the Earth scene.
//!
//! Per-tick deltas are applied once per animation frame; effect steps are
//! applied once per firing of the effect's own interval.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Bodies
// ---------------------------------------------------------------------------

/// Radius of the globe.
pub const GLOBE_RADIUS: f32 = 1.0;
/// Radius of the cloud shell.
pub const CLOUD_RADIUS: f32 = 1.015;
/// Radius of the atmosphere glow shell.
pub const ATMOSPHERE_RADIUS: f32 = 1.03;
/// Radius of the aurora shell.
pub const AURORA_RADIUS: f32 = 1.06;
/// Radius of the sun body.
pub const SUN_RADIUS: f32 = 0.35;
/// World position of the sun body.
pub const SUN_POSITION: [f32; 3] = [2.8, 0.8, -1.0];
/// Segment count for the Earth shells.
pub const EARTH_SEGMENTS: u32 = 128;
/// Segment count for the sun spheres.
pub const SUN_SEGMENTS: u32 = 64;

// ---------------------------------------------------------------------------
// Per-frame animation
// ---------------------------------------------------------------------------

/// Globe spin per frame (radians about +Y).
pub const GLOBE_SPIN: f32 = 0.0008;
/// Cloud shell spin per frame.
pub const CLOUD_SPIN: f32 = 0.0011;
/// Sun body spin per frame.
pub const SUN_SPIN: f32 = 0.002;
/// Sun surface texture drift per frame (u, v).
pub const SUN_TEXTURE_DRIFT: [f32; 2] = [0.0005, 0.0003];
/// Aurora shader clock advance per frame.
pub const AURORA_TIME_STEP: f32 = 0.015;
/// Beam shader clock advance per frame.
pub const BEAM_TIME_STEP: f32 = 0.03;
/// Sun opacity midpoint.
pub const SUN_OPACITY_BASE: f32 = 0.6;
/// Sun opacity swing around the midpoint.
pub const SUN_OPACITY_SWING: f32 = 0.3;
/// Angular rate of the sun flicker, radians per millisecond.
pub const SUN_OPACITY_RATE: f64 = 0.01;
/// Multiplier applied to the sun pulse every frame.
pub const PULSE_DECAY: f32 = 0.94;
/// Upper clamp of the sun pulse.
pub const PULSE_MAX: f32 = 2.0;
/// Key light intensity, pinned every frame.
pub const SUN_LIGHT_INTENSITY: f32 = 4.0;
/// Atmosphere glow intensity, pinned every frame.
pub const ATMOSPHERE_INTENSITY: f32 = 0.6;

// ---------------------------------------------------------------------------
// Solar beam
// ---------------------------------------------------------------------------

/// Width and height of the beam cross-section.
pub const BEAM_CROSS_SECTION: f32 = 0.06;
/// Gap between the sun surface and the beam start.
pub const BEAM_SURFACE_GAP: f32 = 0.01;
/// Length-axis scale at fire time.
pub const BEAM_INITIAL_SCALE: f32 = 0.01;
/// Length-axis growth per beam tick.
pub const BEAM_GROW_STEP: f32 = 0.08;
/// Cross-axis shrink per beam tick.
pub const BEAM_SHRINK_STEP: f32 = 0.05;
/// Cross-axis scale at which the beam is removed.
pub const BEAM_MIN_SCALE: f32 = 0.01;
/// Beam tick period (about 60 Hz).
pub const BEAM_TICK: Duration = Duration::from_millis(16);

// ---------------------------------------------------------------------------
// Aurora
// ---------------------------------------------------------------------------

/// Intensity change per aurora tick.
pub const AURORA_STEP: f32 = 0.04;
/// Aurora fade tick period.
pub const AURORA_TICK: Duration = Duration::from_millis(40);
/// Hold time used by the storm sequence.
pub const AURORA_STORM_DURATION: Duration = Duration::from_millis(5000);

// ---------------------------------------------------------------------------
// Sun-wave sequence (offsets from activation)
// ---------------------------------------------------------------------------

/// Pulse value set when the sun charges.
pub const SUN_WAVE_PULSE: f32 = 3.5;
/// Offset of the beam stage.
pub const SUN_WAVE_BEAM_AT: Duration = Duration::from_millis(600);
/// Offset of the alert overlay stage.
pub const SUN_WAVE_ALERT_AT: Duration = Duration::from_millis(900);
/// Offset of the aurora stage.
pub const SUN_WAVE_AURORA_AT: Duration = Duration::from_millis(1400);
/// Offset of the cleanup stage, which also releases the latch.
pub const SUN_WAVE_CLEANUP_AT: Duration = Duration::from_millis(4200);

// ---------------------------------------------------------------------------
// Live magnetic graph
// ---------------------------------------------------------------------------

/// Smoothed samples retained for the plot.
pub const HISTORY_CAPACITY: usize = 80;
/// Exponential smoothing factor.
pub const SMOOTHING_FACTOR: f64 = 0.15;
/// Value mapped to the top edge of the plot (µT).
pub const GRAPH_MAX_VALUE: f64 = 80.0;
/// Plot surface width in pixels.
pub const CHART_WIDTH: f64 = 400.0;
/// Plot surface height in pixels.
pub const CHART_HEIGHT: f64 = 160.0;
/// Plot stroke colour.
pub const GRAPH_STROKE: &str = "#00eaff";
/// Plot stroke width.
pub const GRAPH_LINE_WIDTH: f64 = 2.0;

// ---------------------------------------------------------------------------
// Synthetic feed
// ---------------------------------------------------------------------------

/// Lowest synthetic sample (µT).
pub const SYNTHETIC_MIN: f64 = 25.0;
/// Width of the synthetic sample range (µT).
pub const SYNTHETIC_SPAN: f64 = 40.0;
/// Period of the synthetic feed.
pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(500);

// ---------------------------------------------------------------------------
// Camera
// ---------------------------------------------------------------------------

/// Vertical field of view in degrees.
pub const CAMERA_FOV_DEGREES: f32 = 45.0;
/// Camera distance along +Z.
pub const CAMERA_DISTANCE: f32 = 3.2;
/// Near clip plane.
pub const CAMERA_NEAR: f32 = 0.1;
/// Far clip plane.
pub const CAMERA_FAR: f32 = 1000.0;

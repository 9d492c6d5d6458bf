//! Applies console commands to the scene.

use std::time::Duration;

use geostorm_scene::constants::AURORA_STORM_DURATION;
use geostorm_scene::hud::ids;
use geostorm_scene::{EarthScene, SceneError};
use geostorm_types::SensorCommand;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::commands::{HELP, ViewerCommand};

/// Whether the viewer keeps running after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep going.
    Continue,
    /// Shut down.
    Quit,
}

/// Carry out `command` at `now`. Sensor commands go to `sensor` when the
/// live feed is running.
pub fn apply(
    scene: &mut EarthScene,
    command: ViewerCommand,
    now: Duration,
    sensor: Option<&mpsc::Sender<SensorCommand>>,
) -> Result<Flow, SceneError> {
    match command {
        ViewerCommand::SunWave => {
            if !scene.trigger_sun_wave(now)? {
                info!("Sun wave already running");
            }
        }
        ViewerCommand::Cancel => {
            if !scene.cancel_sun_wave(now)? {
                info!("No sun wave to cancel");
            }
        }
        ViewerCommand::Aurora => {
            if !scene.trigger_aurora(now, AURORA_STORM_DURATION) {
                info!("Aurora already showing");
            }
        }
        ViewerCommand::FireBeam => {
            scene.fire_solar_beam(now)?;
        }
        ViewerCommand::ShrinkBeam => {
            if !scene.shrink_solar_beam(now) {
                info!("No beam to shrink");
            }
        }
        ViewerCommand::ToggleLive => {
            let expanded = scene.toggle_live_view();
            info!(expanded, "Live view");
        }
        ViewerCommand::Theory => scene.hud_mut().enter_theory(),
        ViewerCommand::Back => scene.hud_mut().leave_theory(),
        ViewerCommand::Status => log_status(scene),
        ViewerCommand::Sensor(kind) => match sensor {
            Some(sensor) => {
                if sensor.try_send(SensorCommand::new(kind)).is_err() {
                    warn!(command = %kind, "Command queue full or closed, command dropped");
                }
            }
            None => warn!(
                command = %kind,
                "Live feed is off; set viewer.live_feed to reach the sensor"
            ),
        },
        ViewerCommand::Help => info!("{HELP}"),
        ViewerCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

/// Log what the page would currently show.
pub fn log_status(scene: &EarthScene) {
    let hud = scene.hud();
    info!(
        strength = hud.readout(ids::B_STRENGTH).unwrap_or("-"),
        current_direction = hud.readout(ids::CURRENT_DIR).unwrap_or("-"),
        field_direction = hud.readout(ids::B_DIR).unwrap_or("-"),
        alert = hud.alert_active(),
        sun_wave_disabled = hud.sun_wave_disabled(),
        theory = hud.theory_mode(),
        live = hud.live_mode(),
        "HUD"
    );
    info!(
        sun_wave = ?scene.sun_wave().phase(),
        next_stage = ?scene.sun_wave().next_stage(),
        beam = ?scene.beam().phase(),
        aurora = ?scene.aurora().phase(),
        aurora_intensity = scene.aurora().intensity(),
        pulse = scene.pulse(),
        smoothed_ut = scene.live_graph().history().smoothed(),
        samples = scene.live_graph().history().len(),
        "Scene"
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use geostorm_scene::{EffectPhase, SceneOptions};
    use geostorm_types::CommandKind;

    use super::*;

    fn scene() -> EarthScene {
        let options = SceneOptions {
            synthetic_feed: false,
            ..SceneOptions::default()
        };
        EarthScene::new(options, Duration::ZERO).unwrap()
    }

    #[test]
    fn wave_then_cancel() {
        let mut scene = scene();
        let now = Duration::from_millis(100);
        assert_eq!(
            apply(&mut scene, ViewerCommand::SunWave, now, None).unwrap(),
            Flow::Continue
        );
        assert!(scene.hud().sun_wave_disabled());
        apply(&mut scene, ViewerCommand::Cancel, now, None).unwrap();
        assert!(!scene.hud().sun_wave_disabled());
        assert_eq!(scene.sun_wave().phase(), EffectPhase::Idle);
    }

    #[test]
    fn beam_commands_drive_the_beam() {
        let mut scene = scene();
        apply(&mut scene, ViewerCommand::FireBeam, Duration::ZERO, None).unwrap();
        assert!(scene.beam().is_active());
        apply(&mut scene, ViewerCommand::ShrinkBeam, Duration::ZERO, None).unwrap();
        assert_eq!(scene.beam().phase(), EffectPhase::Cooling);
    }

    #[test]
    fn theory_and_back_toggle_the_hud() {
        let mut scene = scene();
        apply(&mut scene, ViewerCommand::Theory, Duration::ZERO, None).unwrap();
        assert!(scene.hud().theory_mode());
        apply(&mut scene, ViewerCommand::Back, Duration::ZERO, None).unwrap();
        assert!(!scene.hud().theory_mode());
    }

    #[test]
    fn sensor_commands_go_to_the_feed() {
        let mut scene = scene();
        let (tx, mut rx) = mpsc::channel(1);
        apply(
            &mut scene,
            ViewerCommand::Sensor(CommandKind::Reset),
            Duration::ZERO,
            Some(&tx),
        )
        .unwrap();
        assert_eq!(rx.try_recv().unwrap().kind().unwrap(), CommandKind::Reset);
    }

    #[test]
    fn sensor_commands_without_a_feed_are_dropped() {
        let mut scene = scene();
        let flow = apply(
            &mut scene,
            ViewerCommand::Sensor(CommandKind::LedOn),
            Duration::ZERO,
            None,
        )
        .unwrap();
        assert_eq!(flow, Flow::Continue);
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut scene = scene();
        assert_eq!(
            apply(&mut scene, ViewerCommand::Quit, Duration::ZERO, None).unwrap(),
            Flow::Quit
        );
    }
}

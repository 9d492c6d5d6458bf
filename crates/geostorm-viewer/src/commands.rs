//! Console commands standing in for the page's buttons and panels.

use std::fmt;
use std::str::FromStr;

use geostorm_types::CommandKind;

/// One line typed on stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerCommand {
    /// The sun-wave button.
    SunWave,
    /// Abort a running sun wave.
    Cancel,
    /// Show the aurora on its own.
    Aurora,
    /// Fire a solar beam on its own.
    FireBeam,
    /// Collapse the current beam.
    ShrinkBeam,
    /// The live-data panel click.
    ToggleLive,
    /// The theory button.
    Theory,
    /// The back button.
    Back,
    /// Log a snapshot of the scene and readouts.
    Status,
    /// Send a command to the sensor through the relay.
    Sensor(CommandKind),
    /// Print the command list.
    Help,
    /// Stop the viewer.
    Quit,
}

/// Lines accepted at the prompt.
pub const HELP: &str = "commands: wave, cancel, aurora, beam, shrink, live, theory, back, \
                        status, led on, led off, reset, calibrate, help, quit";

/// A line that is not a known command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown command {0:?} (try `help`)")]
pub struct UnknownCommand(pub String);

impl FromStr for ViewerCommand {
    type Err = UnknownCommand;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let normalized = line.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        let command = match normalized.as_str() {
            "wave" | "sun wave" | "sunwave" => Self::SunWave,
            "cancel" => Self::Cancel,
            "aurora" => Self::Aurora,
            "beam" => Self::FireBeam,
            "shrink" => Self::ShrinkBeam,
            "live" => Self::ToggleLive,
            "theory" => Self::Theory,
            "back" => Self::Back,
            "status" => Self::Status,
            "led on" => Self::Sensor(CommandKind::LedOn),
            "led off" => Self::Sensor(CommandKind::LedOff),
            "reset" => Self::Sensor(CommandKind::Reset),
            "calibrate" => Self::Sensor(CommandKind::Calibrate),
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => return Err(UnknownCommand(line.trim().to_owned())),
        };
        Ok(command)
    }
}

impl fmt::Display for ViewerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SunWave => f.write_str("wave"),
            Self::Cancel => f.write_str("cancel"),
            Self::Aurora => f.write_str("aurora"),
            Self::FireBeam => f.write_str("beam"),
            Self::ShrinkBeam => f.write_str("shrink"),
            Self::ToggleLive => f.write_str("live"),
            Self::Theory => f.write_str("theory"),
            Self::Back => f.write_str("back"),
            Self::Status => f.write_str("status"),
            Self::Sensor(kind) => write!(f, "sensor {kind}"),
            Self::Help => f.write_str("help"),
            Self::Quit => f.write_str("quit"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_scene_commands() {
        assert_eq!("wave".parse::<ViewerCommand>().unwrap(), ViewerCommand::SunWave);
        assert_eq!("  Sun   Wave ".parse::<ViewerCommand>().unwrap(), ViewerCommand::SunWave);
        assert_eq!("beam".parse::<ViewerCommand>().unwrap(), ViewerCommand::FireBeam);
        assert_eq!("live".parse::<ViewerCommand>().unwrap(), ViewerCommand::ToggleLive);
    }

    #[test]
    fn parses_sensor_commands() {
        assert_eq!(
            "LED on".parse::<ViewerCommand>().unwrap(),
            ViewerCommand::Sensor(CommandKind::LedOn)
        );
        assert_eq!(
            "calibrate".parse::<ViewerCommand>().unwrap(),
            ViewerCommand::Sensor(CommandKind::Calibrate)
        );
    }

    #[test]
    fn unknown_lines_are_errors() {
        let err = "warp 9".parse::<ViewerCommand>().unwrap_err();
        assert_eq!(err, UnknownCommand(String::from("warp 9")));
        assert!(err.to_string().contains("help"));
    }

    #[test]
    fn every_listed_command_parses() {
        let list = HELP.trim_start_matches("commands: ");
        for name in list.split(", ") {
            assert!(name.parse::<ViewerCommand>().is_ok(), "{name} does not parse");
        }
    }
}

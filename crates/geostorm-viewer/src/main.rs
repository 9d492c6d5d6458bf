//! Headless Geostorm viewer.
//!
//! Drives the Earth scene exactly as the page does: one frame per tick of
//! the frame interval, effects polled against the frame clock, and the
//! page's buttons replaced by console commands on stdin (`help` lists
//! them). With `viewer.live_feed` set, readings from the relay feed the
//! readouts and the graph, and strong readings start the sun wave;
//! otherwise the synthetic feed runs.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `geostorm-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing), `RUST_LOG` first
//! 3. Build the Earth scene
//! 4. Start the live feed if enabled
//! 5. Run the frame loop until `quit` or Ctrl-C

mod commands;
mod console;
mod error;
mod feed;
mod renderer;

use std::path::Path;
use std::time::Duration;

use geostorm_core::config::GeostormConfig;
use geostorm_scene::{EarthScene, SceneOptions};
use geostorm_types::SensorReading;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Instant, MissedTickBehavior, interval};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::commands::{HELP, ViewerCommand};
use crate::console::Flow;
use crate::error::ViewerError;
use crate::feed::LiveFeed;
use crate::renderer::SummaryRenderer;

const CONFIG_PATH: &str = "geostorm-config.yaml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    run().await?;
    Ok(())
}

async fn run() -> Result<(), ViewerError> {
    let config = GeostormConfig::load_or_default(Path::new(CONFIG_PATH))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    let viewer = config.viewer;
    info!(
        live_feed = viewer.live_feed,
        relay_url = %viewer.relay_url,
        frame_interval_ms = viewer.frame_interval_ms,
        sample_interval_ms = viewer.sample_interval_ms,
        storm_threshold_ut = viewer.storm_threshold_ut,
        "geostorm-viewer starting"
    );

    let clock = Instant::now();
    let options = SceneOptions {
        seed: viewer.seed,
        sample_interval: Duration::from_millis(viewer.sample_interval_ms),
        synthetic_feed: !viewer.live_feed,
        storm_threshold_ut: viewer.live_feed.then_some(viewer.storm_threshold_ut),
        ..SceneOptions::default()
    };
    let mut scene = EarthScene::new(options, clock.elapsed())?;
    info!(nodes = scene.graph().len(), "Earth scene built");

    let frame_interval = Duration::from_millis(viewer.frame_interval_ms.max(1));
    let frames_per_second = 1000_u64
        .checked_div(viewer.frame_interval_ms)
        .unwrap_or(1);
    let mut renderer = SummaryRenderer::new(frames_per_second);

    let mut feed = if viewer.live_feed {
        Some(LiveFeed::spawn(&viewer)?)
    } else {
        None
    };

    let mut ticker = interval(frame_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    info!("{HELP}");

    loop {
        tokio::select! {
            _ = ticker.tick() => scene.frame(clock.elapsed(), &mut renderer)?,
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) if line.trim().is_empty() => {}
                Some(line) => match line.parse::<ViewerCommand>() {
                    Ok(command) => {
                        let sensor = feed.as_ref().map(LiveFeed::commands);
                        if console::apply(&mut scene, command, clock.elapsed(), sensor)? == Flow::Quit {
                            break;
                        }
                    }
                    Err(e) => warn!("{e}"),
                },
                None => stdin_open = false,
            },
            Some(reading) = next_reading(feed.as_mut()) => {
                scene.apply_reading(&reading, clock.elapsed())?;
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                info!("Ctrl-C received, shutting down");
                break;
            }
        }
    }

    if let Some(feed) = feed {
        feed.stop();
    }
    info!(
        frames = renderer.frames(),
        visible = renderer.last_visible(),
        "geostorm-viewer shutdown complete"
    );
    Ok(())
}

/// Next live reading, or never when the feed is off.
async fn next_reading(feed: Option<&mut LiveFeed>) -> Option<SensorReading> {
    match feed {
        Some(feed) => feed.next_reading().await,
        None => std::future::pending().await,
    }
}

//! Simulated magnetometer sensor for Geostorm.
//!
//! Stands in for the embedded board: connects to the relay with a
//! non-browser `User-Agent`, publishes a `sensor_data` frame on a fixed
//! interval, and obeys `LED_ON`, `LED_OFF`, `RESET` and `CALIBRATE`
//! commands from the viewer. A dropped connection is retried on a fixed
//! interval.

mod client;
mod device;
mod error;
mod magnetometer;

use std::path::Path;

use geostorm_core::config::GeostormConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::device::Device;
use crate::error::SensorError;

const CONFIG_PATH: &str = "geostorm-config.yaml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    run().await?;
    Ok(())
}

async fn run() -> Result<(), SensorError> {
    let config = GeostormConfig::load_or_default(Path::new(CONFIG_PATH))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    let sensor = config.sensor;
    info!(
        relay_url = %sensor.relay_url,
        user_agent = %sensor.user_agent,
        send_interval_ms = sensor.send_interval_ms,
        reconnect_interval_ms = sensor.reconnect_interval_ms,
        seed = sensor.seed,
        "geostorm-sensor starting"
    );

    let mut device = Device::new(sensor.seed);
    tokio::select! {
        result = client::run(&sensor, &mut device) => result?,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Ctrl-C received, shutting down");
        }
    }
    Ok(())
}

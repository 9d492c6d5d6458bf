//! Relay connection loop with fixed-interval reconnect.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use geostorm_core::config::SensorConfig;
use tokio::net::TcpStream;
use tokio::time::{MissedTickBehavior, interval, sleep};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::USER_AGENT;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

use crate::device::{Device, Disposition};
use crate::error::SensorError;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Handshake request for the relay carrying the sensor's `User-Agent`.
pub fn relay_request(url: &str, user_agent: &str) -> Result<Request, SensorError> {
    let mut request = url.into_client_request()?;
    request
        .headers_mut()
        .insert(USER_AGENT, HeaderValue::from_str(user_agent)?);
    Ok(request)
}

/// Publish readings to the relay forever, reconnecting after every drop.
///
/// Only a malformed URL or `User-Agent` ends the loop.
pub async fn run(config: &SensorConfig, device: &mut Device) -> Result<(), SensorError> {
    let send_every = Duration::from_millis(config.send_interval_ms);
    let reconnect_after = Duration::from_millis(config.reconnect_interval_ms);

    loop {
        let request = relay_request(&config.relay_url, &config.user_agent)?;
        info!(url = %config.relay_url, "Connecting to relay");

        match connect_async(request).await {
            Ok((socket, _)) => {
                info!("Connected to relay");
                let reason = session(socket, device, send_every).await;
                warn!(reason = %reason, "Relay connection lost");
            }
            Err(e) => warn!(error = %e, "Failed to connect to relay"),
        }

        sleep(reconnect_after).await;
    }
}

/// One connection: send a reading every tick, handle commands as they
/// arrive. Returns why the session ended.
async fn session(socket: Socket, device: &mut Device, send_every: Duration) -> String {
    let (mut sink, mut stream) = socket.split();
    let mut ticker = interval(send_every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let Some(frame) = device.next_frame() else {
                    continue;
                };
                if let Err(e) = sink.send(Message::text(frame)).await {
                    return format!("send failed: {e}");
                }
            }
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if device.handle_text(text.as_str()) == Disposition::Restart {
                        if let Err(e) = sink.send(Message::Close(None)).await {
                            debug!(error = %e, "Close before restart failed");
                        }
                        return String::from("restart requested");
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    return frame.map_or_else(
                        || String::from("closed by relay"),
                        |frame| format!("closed by relay: {} {}", u16::from(frame.code), frame.reason.as_str()),
                    );
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return format!("read failed: {e}"),
                None => return String::from("stream ended"),
            },
        }
    }
}

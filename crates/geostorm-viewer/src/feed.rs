//! Live relay feed: readings in, sensor commands out.
//!
//! Runs on its own task so the frame loop never waits on the network.
//! Readings arrive on a channel the frame loop drains; commands go out on
//! another. Commands issued while the relay is unreachable are dropped,
//! matching the relay's own no-queueing rule.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use geostorm_core::config::ViewerConfig;
use geostorm_types::{SensorCommand, SensorMessage, SensorReading};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::USER_AGENT;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

use crate::error::ViewerError;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Delay between reconnect attempts.
const RECONNECT_DELAY: Duration = Duration::from_secs(3);

/// Readings buffered between the feed task and the frame loop.
const READING_BUFFER: usize = 64;

/// Commands buffered between the console and the feed task.
const COMMAND_BUFFER: usize = 16;

/// Handshake request for the relay carrying the viewer's `User-Agent`.
pub fn relay_request(url: &str, user_agent: &str) -> Result<Request, ViewerError> {
    let mut request = url.into_client_request()?;
    request
        .headers_mut()
        .insert(USER_AGENT, HeaderValue::from_str(user_agent)?);
    Ok(request)
}

/// Handle to the running feed task.
#[derive(Debug)]
pub struct LiveFeed {
    readings: mpsc::Receiver<SensorReading>,
    commands: mpsc::Sender<SensorCommand>,
    task: JoinHandle<()>,
}

impl LiveFeed {
    /// Validate the relay settings and start the feed task.
    pub fn spawn(config: &ViewerConfig) -> Result<Self, ViewerError> {
        relay_request(&config.relay_url, &config.user_agent)?;
        let (reading_tx, readings) = mpsc::channel(READING_BUFFER);
        let (commands, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let task = tokio::spawn(run(
            config.relay_url.clone(),
            config.user_agent.clone(),
            reading_tx,
            command_rx,
        ));
        Ok(Self {
            readings,
            commands,
            task,
        })
    }

    /// Next reading from the sensor. `None` once the task has stopped.
    pub async fn next_reading(&mut self) -> Option<SensorReading> {
        self.readings.recv().await
    }

    /// Queue for commands bound for the sensor.
    pub const fn commands(&self) -> &mpsc::Sender<SensorCommand> {
        &self.commands
    }

    /// Stop the feed task.
    pub fn stop(self) {
        self.task.abort();
    }
}

enum SessionEnd {
    /// The frame loop went away.
    Shutdown,
    /// The connection dropped; try again.
    Disconnected(String),
}

async fn run(
    url: String,
    user_agent: String,
    readings: mpsc::Sender<SensorReading>,
    mut commands: mpsc::Receiver<SensorCommand>,
) {
    loop {
        info!(url = %url, "Connecting to relay");
        let connected = match relay_request(&url, &user_agent) {
            Ok(request) => connect_async(request).await,
            Err(e) => {
                warn!(error = %e, "Relay request rejected, live feed stopped");
                return;
            }
        };

        match connected {
            Ok((socket, _)) => {
                info!("Live feed connected");
                match session(socket, &readings, &mut commands).await {
                    SessionEnd::Shutdown => {
                        debug!("Live feed shutting down");
                        return;
                    }
                    SessionEnd::Disconnected(reason) => {
                        warn!(reason = %reason, "Relay connection lost");
                    }
                }
            }
            Err(e) => warn!(error = %e, "Failed to connect to relay"),
        }

        let retry = sleep(RECONNECT_DELAY);
        tokio::pin!(retry);
        loop {
            tokio::select! {
                () = &mut retry => break,
                command = commands.recv() => match command {
                    Some(command) => {
                        warn!(command = %command.command, "Relay not connected, command dropped");
                    }
                    None => return,
                },
            }
        }
    }
}

async fn session(
    socket: Socket,
    readings: &mpsc::Sender<SensorReading>,
    commands: &mut mpsc::Receiver<SensorCommand>,
) -> SessionEnd {
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => match SensorMessage::parse(text.as_str()) {
                    Ok(SensorMessage::SensorData(reading)) => {
                        if readings.send(reading).await.is_err() {
                            return SessionEnd::Shutdown;
                        }
                    }
                    Err(e) => debug!(error = %e, "Ignoring frame that is not sensor data"),
                },
                Some(Ok(Message::Close(frame))) => {
                    return SessionEnd::Disconnected(frame.map_or_else(
                        || String::from("closed by relay"),
                        |frame| format!("closed by relay: {} {}", u16::from(frame.code), frame.reason.as_str()),
                    ));
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return SessionEnd::Disconnected(format!("read failed: {e}")),
                None => return SessionEnd::Disconnected(String::from("stream ended")),
            },
            command = commands.recv() => {
                let Some(command) = command else {
                    return SessionEnd::Shutdown;
                };
                match command.to_json() {
                    Ok(json) => {
                        if let Err(e) = sink.send(Message::text(json)).await {
                            return SessionEnd::Disconnected(format!("send failed: {e}"));
                        }
                        info!(command = %command.command, "Command sent to sensor");
                    }
                    Err(e) => warn!(error = %e, "Failed to encode command"),
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_the_browser_user_agent() {
        let config = ViewerConfig::default();
        let request = relay_request(&config.relay_url, &config.user_agent).unwrap();
        let user_agent = request.headers().get(USER_AGENT).unwrap().to_str().unwrap();
        assert!(user_agent.contains("Mozilla"));
    }

    #[tokio::test]
    async fn spawn_rejects_a_bad_url() {
        let config = ViewerConfig {
            relay_url: String::from("::not a url::"),
            ..ViewerConfig::default()
        };
        assert!(matches!(
            LiveFeed::spawn(&config),
            Err(ViewerError::RelayUrl { .. })
        ));
    }

    #[tokio::test]
    async fn readings_from_the_relay_reach_the_frame_loop() {
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut socket = tokio_tungstenite::accept_async(stream).await.unwrap();
            socket
                .send(Message::text(
                    r#"{"type":"sensor_data","field_strength":61.5,"current_direction":"East","field_direction":[1.0,0.0,0.0]}"#,
                ))
                .await
                .unwrap();
            socket.next().await
        });

        let config = ViewerConfig {
            relay_url: format!("ws://{addr}/ws"),
            ..ViewerConfig::default()
        };
        let mut feed = LiveFeed::spawn(&config).unwrap();
        let reading = tokio::time::timeout(Duration::from_secs(2), feed.next_reading())
            .await
            .unwrap()
            .unwrap();
        assert!((reading.field_strength - 61.5).abs() < f64::EPSILON);

        feed.commands()
            .send(SensorCommand::new(geostorm_types::CommandKind::LedOn))
            .await
            .unwrap();
        let received = tokio::time::timeout(Duration::from_secs(2), server)
            .await
            .unwrap()
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(received, Message::text(r#"{"command":"LED_ON"}"#));
        feed.stop();
    }
}

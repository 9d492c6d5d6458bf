//! Shared relay state: one connection slot per role plus counters.
//!
//! Each slot holds the outgoing queue of the connection currently bound
//! to that role. A new connection of the same role takes the slot and the
//! previous holder is handed back to the caller so it can be told to
//! close. Slots are released by connection id, so a replaced socket that
//! closes late never clears its successor.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use axum::extract::ws::Message;
use chrono::{DateTime, Utc};
use geostorm_types::{ClientRole, ConnectionId};
use serde::Serialize;
use tokio::sync::{Mutex, mpsc};
use tracing::debug;

/// The connection currently bound to a role.
#[derive(Debug, Clone)]
pub struct Peer {
    /// Connection identity.
    pub id: ConnectionId,
    /// Outgoing frame queue drained by the connection's writer task.
    pub tx: mpsc::UnboundedSender<Message>,
    /// When the connection took the slot.
    pub connected_at: DateTime<Utc>,
}

/// Status of one role slot, as served by `GET /api/relay/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotStatus {
    /// Whether a connection holds the slot.
    pub connected: bool,
    /// Identity of the holder.
    pub connection_id: Option<ConnectionId>,
    /// When the holder connected.
    pub connected_at: Option<DateTime<Utc>>,
    /// Connections of this role accepted since start.
    pub accepted: u64,
}

/// Relay status snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelayStatus {
    /// The sensor slot.
    pub sensor: SlotStatus,
    /// The viewer slot.
    pub viewer: SlotStatus,
    /// Frames delivered to a peer.
    pub messages_forwarded: u64,
    /// Frames dropped because the peer slot was empty or closed, or the
    /// sender had been replaced.
    pub messages_dropped: u64,
}

#[derive(Debug, Default)]
struct Slot {
    holder: Mutex<Option<Peer>>,
    accepted: AtomicU64,
}

impl Slot {
    async fn status(&self) -> SlotStatus {
        let holder = self.holder.lock().await;
        SlotStatus {
            connected: holder.is_some(),
            connection_id: holder.as_ref().map(|peer| peer.id),
            connected_at: holder.as_ref().map(|peer| peer.connected_at),
            accepted: self.accepted.load(Ordering::Relaxed),
        }
    }
}

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`](std::sync::Arc) and injected via Axum's `State`
/// extractor.
#[derive(Debug)]
pub struct RelayState {
    viewer_marker: String,
    static_dir: PathBuf,
    sensor: Slot,
    viewer: Slot,
    forwarded: AtomicU64,
    dropped: AtomicU64,
}

impl RelayState {
    /// Empty slots. `viewer_marker` is the `User-Agent` substring that marks
    /// a viewer; `static_dir` is served at the root.
    pub fn new(viewer_marker: impl Into<String>, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            viewer_marker: viewer_marker.into(),
            static_dir: static_dir.into(),
            sensor: Slot::default(),
            viewer: Slot::default(),
            forwarded: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    /// Directory of static assets.
    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }

    /// Role of a connection with this `User-Agent`.
    pub fn classify(&self, user_agent: Option<&str>) -> ClientRole {
        ClientRole::classify(user_agent, &self.viewer_marker)
    }

    const fn slot(&self, role: ClientRole) -> &Slot {
        match role {
            ClientRole::Sensor => &self.sensor,
            ClientRole::Viewer => &self.viewer,
        }
    }

    /// Bind a connection to `role`. Returns the connection it replaced.
    pub async fn install(
        &self,
        role: ClientRole,
        id: ConnectionId,
        tx: mpsc::UnboundedSender<Message>,
    ) -> Option<Peer> {
        let slot = self.slot(role);
        let replaced = slot.holder.lock().await.replace(Peer {
            id,
            tx,
            connected_at: Utc::now(),
        });
        slot.accepted.fetch_add(1, Ordering::Relaxed);
        replaced
    }

    /// Free the slot of `role` if `id` still holds it. Returns whether it
    /// did.
    pub async fn release(&self, role: ClientRole, id: ConnectionId) -> bool {
        let mut holder = self.slot(role).holder.lock().await;
        if holder.as_ref().is_some_and(|peer| peer.id == id) {
            *holder = None;
            return true;
        }
        false
    }

    /// Queue `message` from connection `sender` of role `from` for the
    /// opposite role. Returns whether a peer took it. Frames are dropped
    /// when the peer slot is empty or when `sender` no longer holds its own
    /// slot.
    pub async fn forward(
        &self,
        from: ClientRole,
        sender: ConnectionId,
        message: Message,
    ) -> bool {
        let to = from.peer();
        let current = self
            .slot(from)
            .holder
            .lock()
            .await
            .as_ref()
            .is_some_and(|peer| peer.id == sender);
        if !current {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            debug!(%from, connection = %sender, "Sender was replaced, message dropped");
            return false;
        }

        let delivered = self
            .slot(to)
            .holder
            .lock()
            .await
            .as_ref()
            .is_some_and(|peer| peer.tx.send(message).is_ok());
        if delivered {
            self.forwarded.fetch_add(1, Ordering::Relaxed);
        } else {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            debug!(%from, %to, "No peer connected, message dropped");
        }
        delivered
    }

    /// Connections of `role` accepted since start.
    pub fn accepted(&self, role: ClientRole) -> u64 {
        self.slot(role).accepted.load(Ordering::Relaxed)
    }

    /// Current status snapshot.
    pub async fn status(&self) -> RelayStatus {
        RelayStatus {
            sensor: self.sensor.status().await,
            viewer: self.viewer.status().await,
            messages_forwarded: self.forwarded.load(Ordering::Relaxed),
            messages_dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn state() -> RelayState {
        RelayState::new("Mozilla", "public")
    }

    #[tokio::test]
    async fn forward_without_peer_is_dropped() {
        let state = state();
        let sensor = ConnectionId::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        state.install(ClientRole::Sensor, sensor, tx).await;

        assert!(!state.forward(ClientRole::Sensor, sensor, Message::Text("x".into())).await);
        let status = state.status().await;
        assert_eq!(status.messages_dropped, 1);
        assert_eq!(status.messages_forwarded, 0);
    }

    #[tokio::test]
    async fn forward_reaches_the_opposite_role_only() {
        let state = state();
        let sensor = ConnectionId::new();
        let (sensor_tx, mut sensor_rx) = mpsc::unbounded_channel();
        let (viewer_tx, mut viewer_rx) = mpsc::unbounded_channel();
        state.install(ClientRole::Sensor, sensor, sensor_tx).await;
        state
            .install(ClientRole::Viewer, ConnectionId::new(), viewer_tx)
            .await;

        assert!(state.forward(ClientRole::Sensor, sensor, Message::Text("reading".into())).await);
        assert_eq!(viewer_rx.recv().await.unwrap(), Message::Text("reading".into()));
        assert!(sensor_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn replaced_sender_is_not_forwarded() {
        let state = state();
        let old_sensor = ConnectionId::new();
        let new_sensor = ConnectionId::new();
        let (sensor_tx, _sensor_rx) = mpsc::unbounded_channel();
        let (viewer_tx, mut viewer_rx) = mpsc::unbounded_channel();
        state.install(ClientRole::Viewer, ConnectionId::new(), viewer_tx).await;
        state.install(ClientRole::Sensor, old_sensor, sensor_tx.clone()).await;
        state.install(ClientRole::Sensor, new_sensor, sensor_tx).await;

        assert!(!state.forward(ClientRole::Sensor, old_sensor, Message::Text("stale".into())).await);
        assert!(viewer_rx.try_recv().is_err());
        assert_eq!(state.status().await.messages_dropped, 1);

        assert!(state.forward(ClientRole::Sensor, new_sensor, Message::Text("fresh".into())).await);
        assert_eq!(viewer_rx.recv().await.unwrap(), Message::Text("fresh".into()));
    }

    #[tokio::test]
    async fn install_returns_replaced_holder() {
        let state = state();
        let first = ConnectionId::new();
        let second = ConnectionId::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        assert!(state.install(ClientRole::Viewer, first, tx.clone()).await.is_none());
        let replaced = state.install(ClientRole::Viewer, second, tx).await.unwrap();
        assert_eq!(replaced.id, first);
        assert_eq!(state.accepted(ClientRole::Viewer), 2);
    }

    #[tokio::test]
    async fn stale_release_keeps_successor() {
        let state = state();
        let first = ConnectionId::new();
        let second = ConnectionId::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        state.install(ClientRole::Sensor, first, tx.clone()).await;
        state.install(ClientRole::Sensor, second, tx).await;

        assert!(!state.release(ClientRole::Sensor, first).await);
        let status = state.status().await;
        assert!(status.sensor.connected);
        assert_eq!(status.sensor.connection_id, Some(second));

        assert!(state.release(ClientRole::Sensor, second).await);
        assert!(!state.status().await.sensor.connected);
    }

    #[tokio::test]
    async fn closed_peer_counts_as_dropped() {
        let state = state();
        let sensor = ConnectionId::new();
        let (sensor_tx, _sensor_rx) = mpsc::unbounded_channel();
        state.install(ClientRole::Sensor, sensor, sensor_tx).await;
        let (tx, rx) = mpsc::unbounded_channel();
        state.install(ClientRole::Viewer, ConnectionId::new(), tx).await;
        drop(rx);
        assert!(!state.forward(ClientRole::Sensor, sensor, Message::Text("x".into())).await);
    }

    #[test]
    fn classification_uses_the_marker() {
        let state = state();
        assert_eq!(
            state.classify(Some("Mozilla/5.0 (X11; Linux x86_64)")),
            ClientRole::Viewer
        );
        assert_eq!(state.classify(Some("ESP32HTTPClient")), ClientRole::Sensor);
        assert_eq!(state.classify(None), ClientRole::Sensor);
    }
}

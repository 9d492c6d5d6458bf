//! WebSocket relay between one magnetometer sensor and one viewer.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws`) pairing exactly one sensor with
//!   exactly one viewer and forwarding frames between them untouched
//! - **Status endpoint** (`GET /api/relay/status`) reporting which roles
//!   are connected and how many frames were forwarded or dropped
//! - **Static files** for the viewer page, served from a configured
//!   directory on the same port
//!
//! # Architecture
//!
//! [`RelayState`] keeps one slot per role. A connection's role comes from
//! its `User-Agent` header. A second connection of a role replaces the
//! first, which is sent a close frame (code 4000, reason `replaced`).
//! Slots are released by connection id, so a replaced socket that closes
//! late leaves its successor in place. Frames for an empty slot are
//! dropped; there is no queueing, retry, or payload inspection.

pub mod handlers;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use startup::{RunningRelay, StartupError, spawn_relay};
pub use state::{RelayState, RelayStatus, SlotStatus};

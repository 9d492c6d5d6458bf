//! REST handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;

use crate::state::{RelayState, RelayStatus};

/// Which roles are connected and how much traffic has passed.
///
/// # Route
///
/// `GET /api/relay/status`
pub async fn relay_status(State(state): State<Arc<RelayState>>) -> Json<RelayStatus> {
    Json(state.status().await)
}

//! Axum router construction for the relay.
//!
//! Assembles the `WebSocket` endpoint, the status endpoint, and static
//! file serving into a single [`Router`] with CORS enabled so a page
//! served elsewhere can still reach the relay.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::RelayState;
use crate::ws;

/// Build the complete Axum router for the relay.
///
/// The router includes:
/// - `GET /ws` -- sensor/viewer relay socket
/// - `GET /api/relay/status` -- slot and traffic status
/// - everything else -- files under the configured static directory
pub fn build_router(state: Arc<RelayState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let assets = ServeDir::new(state.static_dir());

    Router::new()
        .route("/ws", get(ws::ws_relay))
        .route("/api/relay/status", get(handlers::relay_status))
        .fallback_service(assets)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

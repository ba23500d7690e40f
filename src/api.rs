//! HTTP API endpoints.
//!
//! Read-only views for the device UI on first load. All mutations go through
//! the WebSocket.

use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

use crate::protocol::{CategoryInfo, SessionInfo, SetupInfo};
use crate::state::AppState;

/// Current session, without roles or the secret item.
///
/// GET /api/session
pub async fn get_session(State(state): State<Arc<AppState>>) -> Json<SessionInfo> {
    Json(state.session_info().await)
}

/// Setup screen values.
///
/// GET /api/setup
pub async fn get_setup(State(state): State<Arc<AppState>>) -> Json<SetupInfo> {
    Json(state.setup_info().await)
}

/// Categories available for the secret item.
///
/// GET /api/categories
pub async fn list_categories(State(state): State<Arc<AppState>>) -> Json<Vec<CategoryInfo>> {
    Json(state.categories())
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/session", get(get_session))
        .route("/api/setup", get(get_setup))
        .route("/api/categories", get(list_categories))
}

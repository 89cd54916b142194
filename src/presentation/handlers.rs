// HTTP request handlers
use crate::application::handoff_session::ReplayProgress;
use crate::domain::bounds::TelemetryBounds;
use crate::domain::connection::ConnectionSnapshot;
use crate::presentation::app_state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct ConnectionResponse {
    pub policy: &'static str,
    #[serde(flatten)]
    pub snapshot: ConnectionSnapshot,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Current connection state, visible networks and label
pub async fn connection_status(State(state): State<Arc<AppState>>) -> Json<ConnectionResponse> {
    let snapshot = state.connection.borrow().clone();
    Json(ConnectionResponse {
        policy: state.policy,
        snapshot,
    })
}

/// Most recently replayed sample
pub async fn replay_status(State(state): State<Arc<AppState>>) -> Json<ReplayProgress> {
    Json(state.progress.borrow().clone())
}

pub async fn telemetry_bounds(State(state): State<Arc<AppState>>) -> Json<TelemetryBounds> {
    Json(state.bounds)
}

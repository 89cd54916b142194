// Main entry point - Dependency injection and replay setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use axum::{routing::get, Router};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

use crate::application::handoff_session::HandoffSession;
use crate::application::replay_driver::ReplayDriver;
use crate::application::telemetry_source::TelemetrySource;
use crate::application::telemetry_store::TelemetryStore;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::json_file_source::JsonFileSource;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{connection_status, health_check, replay_status, telemetry_bounds};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let app_config = load_app_config()?;

    // Load telemetry (infrastructure layer)
    let source = JsonFileSource::new(&app_config.data.path);
    let store = match TelemetryStore::load(&source).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!("No data: {}", e);
            return Err(e.into());
        }
    };
    let bounds = match store.bounds() {
        Ok(bounds) => {
            tracing::info!(
                "Telemetry covers t={}..{} ({} units)",
                bounds.min_timestamp,
                bounds.max_timestamp,
                bounds.duration()
            );
            *bounds
        }
        Err(e) => {
            tracing::error!("No data: {} has no usable samples", source.describe());
            return Err(e.into());
        }
    };

    // Create session and driver (application layer)
    let policy = app_config.policy.build()?;
    tracing::info!("Using {} policy", policy.name());
    let policy_name = policy.name();
    let (session, handles) = HandoffSession::new(policy);
    let mut driver = ReplayDriver::new(store.clone(), app_config.replay, session)?;

    // Optional status server (presentation layer)
    let server = match &app_config.server.bind {
        Some(bind) => {
            let state = Arc::new(AppState {
                policy: policy_name,
                bounds,
                connection: handles.connection.clone(),
                progress: handles.progress.clone(),
            });
            Some(spawn_status_server(bind, state).await?)
        }
        None => None,
    };

    driver.start();

    tokio::select! {
        _ = handles.finished => tracing::info!("Simulation finished"),
        _ = tokio::signal::ctrl_c() => tracing::info!("Interrupted, stopping replay"),
    }
    driver.stop().await;

    let last = handles.connection.borrow().clone();
    tracing::info!(
        "Final connection: {} ({} samples replayed)",
        last.current_network,
        handles.progress.borrow().samples_delivered
    );

    if let Some((shutdown, task)) = server {
        let _ = shutdown.send(());
        task.await??;
    }

    Ok(())
}

async fn spawn_status_server(
    bind: &str,
    state: Arc<AppState>,
) -> anyhow::Result<(oneshot::Sender<()>, JoinHandle<std::io::Result<()>>)> {
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/connection", get(connection_status))
        .route("/replay", get(replay_status))
        .route("/bounds", get(telemetry_bounds))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!("Serving status on {}", listener.local_addr()?);

    let (shutdown, shutdown_rx) = oneshot::channel::<()>();
    let task = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
    });

    Ok((shutdown, task))
}

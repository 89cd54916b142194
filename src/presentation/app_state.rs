// Application state for HTTP handlers
use crate::application::handoff_session::ReplayProgress;
use crate::domain::bounds::TelemetryBounds;
use crate::domain::connection::ConnectionSnapshot;
use tokio::sync::watch;

#[derive(Clone)]
pub struct AppState {
    pub policy: &'static str,
    pub bounds: TelemetryBounds,
    pub connection: watch::Receiver<ConnectionSnapshot>,
    pub progress: watch::Receiver<ReplayProgress>,
}

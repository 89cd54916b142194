// Connection state and decision domain models
use serde::Serialize;
use std::fmt;

/// Label shown for the current network while no link is up.
pub const NOT_CONNECTED_LABEL: &str = "not connected";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "status", content = "network", rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected(String),
}

impl ConnectionState {
    pub fn network(&self) -> Option<&str> {
        match self {
            ConnectionState::Connected(name) => Some(name),
            ConnectionState::Disconnected => None,
        }
    }

    pub fn label(&self) -> &str {
        self.network().unwrap_or(NOT_CONNECTED_LABEL)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Connected(name) => write!(f, "connected({})", name),
            ConnectionState::Disconnected => write!(f, "disconnected"),
        }
    }
}

/// Verdict of a decision policy for one set of observations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Stay,
    Disconnect,
    SwitchTo(String),
}

/// What the presentation side gets on every notified transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionSnapshot {
    pub state: ConnectionState,
    pub available_networks: Vec<String>,
    pub current_network: String,
}

impl Default for ConnectionSnapshot {
    fn default() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            available_networks: Vec::new(),
            current_network: NOT_CONNECTED_LABEL.to_string(),
        }
    }
}

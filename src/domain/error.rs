// Error types shared across layers

/// Failure to produce a telemetry store from a source.
///
/// Per-record problems never show up here: malformed records are dropped
/// during ingestion. Only a source that cannot be read at all, or whose
/// top-level shape is not a record mapping, fails the load.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("telemetry source not found: {0}")]
    SourceNotFound(String),

    #[error("telemetry source is not a record mapping: {0}")]
    MalformedTopLevel(String),

    #[error("failed to read telemetry source: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// Bounds (and therefore replay) are undefined without samples.
    #[error("telemetry store is empty")]
    Empty,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SettingsError {
    #[error("invalid replay settings: {0}")]
    InvalidReplay(String),

    #[error("invalid policy settings: {0}")]
    InvalidPolicy(String),
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ReplayError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

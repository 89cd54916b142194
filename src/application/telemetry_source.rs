// Source trait for raw telemetry records
use crate::domain::error::IngestError;
use async_trait::async_trait;
use serde_json::Value;

/// Somewhere raw telemetry records can be fetched from.
///
/// Implementations hand back the undecoded top-level document; shape
/// validation and per-record filtering belong to the store.
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Human-readable location, used in logs and errors
    fn describe(&self) -> String;

    async fn fetch_records(&self) -> Result<Value, IngestError>;
}

/// Source backed by an already-decoded document.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    document: Value,
}

impl InMemorySource {
    pub fn new(document: Value) -> Self {
        Self { document }
    }
}

#[async_trait]
impl TelemetrySource for InMemorySource {
    fn describe(&self) -> String {
        "in-memory document".to_string()
    }

    async fn fetch_records(&self) -> Result<Value, IngestError> {
        Ok(self.document.clone())
    }
}

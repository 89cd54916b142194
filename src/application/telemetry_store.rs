// Telemetry store - Validated, time-ordered samples for one run
use crate::application::telemetry_source::TelemetrySource;
use crate::domain::bounds::TelemetryBounds;
use crate::domain::error::{IngestError, StoreError};
use crate::domain::sample::Sample;
use serde_json::Value;

/// Immutable collection of samples sorted ascending by timestamp.
///
/// Bounds are derived once at construction; the samples never change
/// afterwards, so a store can be shared behind an `Arc` by any number of
/// readers.
#[derive(Debug, Clone)]
pub struct TelemetryStore {
    samples: Vec<Sample>,
    bounds: Option<TelemetryBounds>,
    dropped_records: usize,
}

impl TelemetryStore {
    /// Fetch and ingest every record the source provides.
    pub async fn load(source: &dyn TelemetrySource) -> Result<Self, IngestError> {
        let document = source.fetch_records().await?;
        let store = Self::from_document(document)?;

        tracing::info!(
            "Loaded {} samples from {} ({} records dropped)",
            store.len(),
            source.describe(),
            store.dropped_records()
        );

        Ok(store)
    }

    /// Ingest a decoded document: a mapping from record id to record object.
    pub fn from_document(document: Value) -> Result<Self, IngestError> {
        let records = match document {
            Value::Object(records) => records,
            other => {
                return Err(IngestError::MalformedTopLevel(format!(
                    "expected an object of records, found {}",
                    json_kind(&other)
                )));
            }
        };

        let mut samples = Vec::with_capacity(records.len());
        let mut dropped_records = 0;

        for (id, record) in &records {
            match Sample::from_record(record) {
                Ok(sample) => samples.push(sample),
                Err(reason) => {
                    tracing::debug!("Dropping record {}: {:?}", id, reason);
                    dropped_records += 1;
                }
            }
        }

        let mut store = Self::from_samples(samples);
        store.dropped_records = dropped_records;
        Ok(store)
    }

    pub fn from_samples(mut samples: Vec<Sample>) -> Self {
        samples.sort();
        let bounds = TelemetryBounds::from_samples(&samples);

        Self {
            samples,
            bounds,
            dropped_records: 0,
        }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Records discarded during ingestion because a required field was bad.
    pub fn dropped_records(&self) -> usize {
        self.dropped_records
    }

    pub fn bounds(&self) -> Result<&TelemetryBounds, StoreError> {
        self.bounds.as_ref().ok_or(StoreError::Empty)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

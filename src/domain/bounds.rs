// Aggregate bounds over a telemetry run
use super::sample::Sample;
use serde::Serialize;

/// Time range and spatial bounding box covered by a set of samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TelemetryBounds {
    pub min_timestamp: i64,
    pub max_timestamp: i64,
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl TelemetryBounds {
    /// Returns `None` for an empty slice; there is no meaningful zero value.
    pub fn from_samples(samples: &[Sample]) -> Option<Self> {
        let (first, rest) = samples.split_first()?;

        let seed = Self {
            min_timestamp: first.timestamp,
            max_timestamp: first.timestamp,
            min_latitude: first.latitude,
            max_latitude: first.latitude,
            min_longitude: first.longitude,
            max_longitude: first.longitude,
        };

        Some(rest.iter().fold(seed, |b, s| Self {
            min_timestamp: b.min_timestamp.min(s.timestamp),
            max_timestamp: b.max_timestamp.max(s.timestamp),
            min_latitude: b.min_latitude.min(s.latitude),
            max_latitude: b.max_latitude.max(s.latitude),
            min_longitude: b.min_longitude.min(s.longitude),
            max_longitude: b.max_longitude.max(s.longitude),
        }))
    }

    pub fn duration(&self) -> i64 {
        self.max_timestamp - self.min_timestamp
    }
}

// Telemetry sample domain model
use super::network::NetworkObservation;
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;

pub const TIMESTAMP_KEY: &str = "timestamp";
pub const LATITUDE_KEY: &str = "latitude_deg";
pub const LONGITUDE_KEY: &str = "longitude_deg";

/// One timestamped telemetry frame: where the agent was and which networks it saw.
///
/// Samples order by `timestamp` alone. Two samples taken at the same instant
/// compare equal even when their position or networks differ.
#[derive(Debug, Clone, Serialize)]
pub struct Sample {
    pub timestamp: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub networks: Vec<NetworkObservation>,
}

/// Why a raw record was not turned into a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordRejection {
    NotAnObject,
    MissingTimestamp,
    MissingLatitude,
    MissingLongitude,
}

impl Sample {
    pub fn new(timestamp: i64, latitude: f64, longitude: f64, networks: Vec<NetworkObservation>) -> Self {
        Self {
            timestamp,
            latitude,
            longitude,
            networks,
        }
    }

    /// Parse one ingestion record.
    ///
    /// Every key other than the three required ones names a candidate network.
    /// Candidates that are not objects or have no usable metric are skipped
    /// without rejecting the record.
    pub fn from_record(record: &Value) -> Result<Self, RecordRejection> {
        let fields = record.as_object().ok_or(RecordRejection::NotAnObject)?;

        let timestamp = fields
            .get(TIMESTAMP_KEY)
            .and_then(Value::as_i64)
            .ok_or(RecordRejection::MissingTimestamp)?;
        let latitude = fields
            .get(LATITUDE_KEY)
            .and_then(Value::as_f64)
            .ok_or(RecordRejection::MissingLatitude)?;
        let longitude = fields
            .get(LONGITUDE_KEY)
            .and_then(Value::as_f64)
            .ok_or(RecordRejection::MissingLongitude)?;

        let networks = fields
            .iter()
            .filter(|(key, _)| !matches!(key.as_str(), TIMESTAMP_KEY | LATITUDE_KEY | LONGITUDE_KEY))
            .filter_map(|(name, value)| {
                let metrics = value.as_object()?;
                NetworkObservation::from_metrics(name, metrics)
            })
            .collect();

        Ok(Self::new(timestamp, latitude, longitude, networks))
    }

    pub fn network_names(&self) -> Vec<String> {
        self.networks.iter().map(|n| n.name.clone()).collect()
    }
}

impl PartialEq for Sample {
    fn eq(&self, other: &Self) -> bool {
        self.timestamp == other.timestamp
    }
}

impl Eq for Sample {}

impl PartialOrd for Sample {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Sample {
    fn cmp(&self, other: &Self) -> Ordering {
        self.timestamp.cmp(&other.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_record_extracts_networks() {
        let record = json!({
            "timestamp": 154912680,
            "latitude_deg": 43.4723,
            "longitude_deg": -80.5449,
            "Rogers": { "rssi_dbm": "-71", "rtt_ms": "38" },
            "Bell": { "bandwidth_kbps": "12000" },
            "Freedom": { "rssi_dbm": "" },
            "note": "not a network"
        });

        let sample = Sample::from_record(&record).unwrap();
        assert_eq!(sample.timestamp, 154912680);
        assert_eq!(sample.latitude, 43.4723);
        assert_eq!(sample.longitude, -80.5449);

        let mut names = sample.network_names();
        names.sort();
        assert_eq!(names, vec!["Bell", "Rogers"]);
    }

    #[test]
    fn test_from_record_accepts_sample_without_networks() {
        let record = json!({ "timestamp": 5, "latitude_deg": 1.0, "longitude_deg": 2 });

        let sample = Sample::from_record(&record).unwrap();
        assert!(sample.networks.is_empty());
        assert_eq!(sample.longitude, 2.0);
    }

    #[test]
    fn test_from_record_rejects_missing_or_bad_required_fields() {
        assert_eq!(
            Sample::from_record(&json!({ "latitude_deg": 1.0, "longitude_deg": 2.0 })),
            Err(RecordRejection::MissingTimestamp)
        );
        assert_eq!(
            Sample::from_record(&json!({ "timestamp": "12", "latitude_deg": 1.0, "longitude_deg": 2.0 })),
            Err(RecordRejection::MissingTimestamp)
        );
        assert_eq!(
            Sample::from_record(&json!({ "timestamp": 1.5, "latitude_deg": 1.0, "longitude_deg": 2.0 })),
            Err(RecordRejection::MissingTimestamp)
        );
        assert_eq!(
            Sample::from_record(&json!({ "timestamp": 1, "latitude_deg": "north", "longitude_deg": 2.0 })),
            Err(RecordRejection::MissingLatitude)
        );
        assert_eq!(
            Sample::from_record(&json!({ "timestamp": 1, "latitude_deg": 1.0 })),
            Err(RecordRejection::MissingLongitude)
        );
        assert_eq!(Sample::from_record(&json!([1, 2, 3])), Err(RecordRejection::NotAnObject));
    }

    #[test]
    fn test_ordering_uses_timestamp_only() {
        let a = Sample::new(10, 1.0, 1.0, vec![]);
        let b = Sample::new(10, 5.0, -5.0, vec![NetworkObservation::with_rssi("Bell", -40.0)]);
        let c = Sample::new(11, 1.0, 1.0, vec![]);

        assert_eq!(a, b);
        assert!(a < c);
        assert_eq!(a.cmp(&b), Ordering::Equal);
    }
}

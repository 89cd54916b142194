// Network observation domain model
use serde::Serialize;
use serde_json::{Map, Value};

/// Metric keys as they appear in a network's ingestion record.
pub mod keys {
    pub const RSSI: &str = "rssi_dbm";
    pub const BANDWIDTH: &str = "bandwidth_kbps";
    pub const JITTER: &str = "jitter_ms";
    pub const LOSS: &str = "loss_percent";
    pub const RTT: &str = "rtt_ms";
}

/// One wireless network seen at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkObservation {
    pub name: String,
    pub rssi_dbm: Option<f64>,
    pub bandwidth_kbps: Option<f64>,
    pub jitter_ms: Option<f64>,
    pub loss_percent: Option<f64>,
    pub rtt_ms: Option<f64>,
}

impl NetworkObservation {
    /// Observation carrying only a signal strength.
    pub fn with_rssi(name: impl Into<String>, rssi_dbm: f64) -> Self {
        Self {
            name: name.into(),
            rssi_dbm: Some(rssi_dbm),
            bandwidth_kbps: None,
            jitter_ms: None,
            loss_percent: None,
            rtt_ms: None,
        }
    }

    /// Build an observation from its raw metric mapping.
    ///
    /// Metrics are string-encoded numbers. A metric that is missing, not a
    /// string, or not a finite number counts as absent. Returns `None` when no
    /// metric survives, since such an observation carries no usable signal.
    pub fn from_metrics(name: &str, metrics: &Map<String, Value>) -> Option<Self> {
        let observation = Self {
            name: name.to_string(),
            rssi_dbm: parse_metric(metrics, keys::RSSI),
            bandwidth_kbps: parse_metric(metrics, keys::BANDWIDTH),
            jitter_ms: parse_metric(metrics, keys::JITTER),
            loss_percent: parse_metric(metrics, keys::LOSS),
            rtt_ms: parse_metric(metrics, keys::RTT),
        };

        observation.has_metric().then_some(observation)
    }

    pub fn has_metric(&self) -> bool {
        self.rssi_dbm.is_some()
            || self.bandwidth_kbps.is_some()
            || self.jitter_ms.is_some()
            || self.loss_percent.is_some()
            || self.rtt_ms.is_some()
    }

    /// Strength used for ranking candidates. Missing signal data ranks as 0 dBm
    /// rather than being penalized.
    pub fn ranking_strength(&self) -> f64 {
        self.rssi_dbm.unwrap_or(0.0)
    }
}

fn parse_metric(metrics: &Map<String, Value>, key: &str) -> Option<f64> {
    metrics
        .get(key)?
        .as_str()?
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metrics(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_from_metrics_parses_all_fields() {
        let m = metrics(json!({
            "rssi_dbm": "-67",
            "bandwidth_kbps": "5400.5",
            "jitter_ms": "3",
            "loss_percent": "0.2",
            "rtt_ms": "41"
        }));

        let obs = NetworkObservation::from_metrics("Rogers", &m).unwrap();
        assert_eq!(obs.name, "Rogers");
        assert_eq!(obs.rssi_dbm, Some(-67.0));
        assert_eq!(obs.bandwidth_kbps, Some(5400.5));
        assert_eq!(obs.jitter_ms, Some(3.0));
        assert_eq!(obs.loss_percent, Some(0.2));
        assert_eq!(obs.rtt_ms, Some(41.0));
    }

    #[test]
    fn test_from_metrics_keeps_partial_observation() {
        let m = metrics(json!({ "rtt_ms": "12", "rssi_dbm": "strong" }));

        let obs = NetworkObservation::from_metrics("Bell", &m).unwrap();
        assert_eq!(obs.rssi_dbm, None);
        assert_eq!(obs.rtt_ms, Some(12.0));
        assert_eq!(obs.ranking_strength(), 0.0);
    }

    #[test]
    fn test_from_metrics_rejects_observation_without_metrics() {
        assert!(NetworkObservation::from_metrics("Empty", &Map::new()).is_none());

        let unparseable = metrics(json!({
            "rssi_dbm": "n/a",
            "jitter_ms": -4,
            "loss_percent": "NaN",
            "rtt_ms": "inf",
            "carrier": "telus"
        }));
        assert!(NetworkObservation::from_metrics("Junk", &unparseable).is_none());
    }
}

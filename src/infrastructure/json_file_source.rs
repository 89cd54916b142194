// JSON file telemetry source
use crate::application::telemetry_source::TelemetrySource;
use crate::domain::error::IngestError;
use async_trait::async_trait;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl TelemetrySource for JsonFileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch_records(&self) -> Result<Value, IngestError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(IngestError::SourceNotFound(self.describe()));
            }
            Err(e) => return Err(IngestError::Io(e)),
        };

        serde_json::from_slice(&bytes)
            .map_err(|e| IngestError::MalformedTopLevel(format!("{}: {}", self.describe(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::telemetry_store::TelemetryStore;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("handoff-{}-{}.json", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_missing_file_is_source_not_found() {
        let source = JsonFileSource::new("/nonexistent/handoff/drive.json");
        let err = TelemetryStore::load(&source).await.unwrap_err();
        assert!(matches!(err, IngestError::SourceNotFound(path) if path.ends_with("drive.json")));
    }

    #[tokio::test]
    async fn test_invalid_json_is_malformed() {
        let path = temp_file("invalid", "{ \"a\": { \"timestamp\": 1, ");
        let err = TelemetryStore::load(&JsonFileSource::new(&path)).await.unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(matches!(err, IngestError::MalformedTopLevel(_)));
    }

    #[tokio::test]
    async fn test_loads_records_from_file() {
        let path = temp_file(
            "drive",
            r#"{
                "r2": { "timestamp": 20, "latitude_deg": 43.1, "longitude_deg": -80.2,
                        "Bell": { "rssi_dbm": "-41", "loss_percent": "1.5" } },
                "r1": { "timestamp": 10, "latitude_deg": 43.0, "longitude_deg": -80.1,
                        "Rogers": { "rssi_dbm": "-55" } }
            }"#,
        );
        let store = TelemetryStore::load(&JsonFileSource::new(&path)).await.unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(store.len(), 2);
        assert_eq!(store.samples()[0].network_names(), vec!["Rogers"]);
        assert_eq!(store.samples()[1].networks[0].loss_percent, Some(1.5));
    }
}

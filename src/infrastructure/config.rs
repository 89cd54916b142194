use crate::application::decision_policy::{DecisionPolicy, GreedyPolicy, HysteresisPolicy};
use crate::domain::error::SettingsError;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Shortest tick period the replay loop will accept.
const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub data: DataSettings,
    pub replay: ReplaySettings,
    pub policy: PolicySettings,
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataSettings {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct ReplaySettings {
    /// Ticks per wall-clock second
    pub frequency_hz: f64,
    /// Simulated seconds per wall-clock second
    pub time_factor: f64,
    /// Timestamp units per simulated second
    pub units_per_second: f64,
}

impl ReplaySettings {
    /// Wall-clock time between ticks.
    pub fn period(&self) -> Result<Duration, SettingsError> {
        Duration::try_from_secs_f64(1.0 / self.frequency_hz).map_err(|e| {
            SettingsError::InvalidReplay(format!(
                "frequency_hz {} gives no usable tick period: {}",
                self.frequency_hz, e
            ))
        })
    }

    /// Virtual clock advance per tick, in timestamp units.
    pub fn clock_step(&self) -> i64 {
        ((1.0 / self.frequency_hz) * self.time_factor * self.units_per_second).round() as i64
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let fields = [
            ("frequency_hz", self.frequency_hz),
            ("time_factor", self.time_factor),
            ("units_per_second", self.units_per_second),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(SettingsError::InvalidReplay(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        if self.period()? < MIN_TICK_PERIOD {
            return Err(SettingsError::InvalidReplay(format!(
                "frequency_hz {} gives a tick period under {:?}",
                self.frequency_hz, MIN_TICK_PERIOD
            )));
        }

        if self.clock_step() < 1 {
            return Err(SettingsError::InvalidReplay(format!(
                "a tick advances the clock by less than one unit ({} Hz, x{}, {} units/s)",
                self.frequency_hz, self.time_factor, self.units_per_second
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    Greedy,
    Hysteresis,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PolicySettings {
    pub kind: PolicyKind,
    /// Only used by the hysteresis policy
    pub minimum_signal_dbm: f64,
}

impl PolicySettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.minimum_signal_dbm.is_finite() {
            return Err(SettingsError::InvalidPolicy(format!(
                "minimum_signal_dbm must be finite, got {}",
                self.minimum_signal_dbm
            )));
        }
        Ok(())
    }

    pub fn build(&self) -> Result<Box<dyn DecisionPolicy>, SettingsError> {
        self.validate()?;

        Ok(match self.kind {
            PolicyKind::Greedy => Box::new(GreedyPolicy::new()),
            PolicyKind::Hysteresis => Box::new(HysteresisPolicy::new(self.minimum_signal_dbm)),
        })
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ServerSettings {
    /// Status endpoint address; no server is started when unset
    pub bind: Option<String>,
}

/// Defaults, then `config/handoff.*` if present, then `HANDOFF_*` env vars
/// (`HANDOFF_REPLAY__TIME_FACTOR=4`).
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    build_app_config(config::File::with_name("config/handoff").required(false))
}

fn build_app_config(file: impl config::Source + Send + Sync + 'static) -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .set_default("data.path", "data/drive.json")?
        .set_default("replay.frequency_hz", 10.0)?
        .set_default("replay.time_factor", 1.0)?
        .set_default("replay.units_per_second", 100.0)?
        .set_default("policy.kind", "hysteresis")?
        .set_default("policy.minimum_signal_dbm", -50.0)?
        .add_source(file)
        .add_source(
            config::Environment::with_prefix("HANDOFF")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let app_config: AppConfig = settings.try_deserialize()?;
    app_config.replay.validate()?;
    app_config.policy.validate()?;

    Ok(app_config)
}

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use hifitime::Duration;

use crate::{
    constants::DEFAULT_MIN_INTERVAL_MS,
    producer::{PowerSettings, TrackingOptions},
};

mod power;
pub use power::{PositioningMode, PowerMode};

/// Configuration Error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("invalid power mode")]
    InvalidPowerMode,
    #[error("invalid positioning mode")]
    InvalidPositioningMode,
}

fn default_min_interval() -> Duration {
    Duration::from_milliseconds(DEFAULT_MIN_INTERVAL_MS as f64)
}

/// Adapter [Config]uration, used when starting the measurement
/// session on the engine side.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Measurement reporting period, when not driven by a power mode.
    /// Defaults to one second.
    #[cfg_attr(
        feature = "serde",
        serde(alias = "interval", default = "default_min_interval")
    )]
    pub min_interval: Duration,

    /// [PositioningMode] the engine is started in
    #[cfg_attr(feature = "serde", serde(default))]
    pub mode: PositioningMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_interval: default_min_interval(),
            mode: PositioningMode::default(),
        }
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "interval={} ", self.min_interval)?;
        write!(f, "mode={}", self.mode)
    }
}

impl Config {
    /// Copies and returns [Config] with desired reporting period
    pub fn with_min_interval(&self, min_interval: Duration) -> Self {
        let mut s = self.clone();
        s.min_interval = min_interval;
        s
    }

    /// Copies and returns [Config] with desired [PositioningMode]
    pub fn with_positioning_mode(&self, mode: PositioningMode) -> Self {
        let mut s = self.clone();
        s.mode = mode;
        s
    }

    /// Reporting period in milliseconds, as expected by the engine.
    pub(crate) fn min_interval_ms(&self) -> u32 {
        let ms = self.min_interval.total_nanoseconds() / 1_000_000;
        u32::try_from(ms.max(0)).unwrap_or(u32::MAX)
    }

    /// Builds the [TrackingOptions] for a client request.
    /// The time between measurements is only forwarded along an actual
    /// [PowerMode], never with [PowerMode::Invalid].
    pub(crate) fn tracking_options(&self, power_mode: PowerMode, tbm_ms: u32) -> TrackingOptions {
        TrackingOptions {
            min_interval_ms: self.min_interval_ms(),
            mode: self.mode,
            power: if power_mode.is_valid() {
                Some(PowerSettings {
                    mode: power_mode,
                    tbm_ms,
                })
            } else {
                None
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Config, PositioningMode, PowerMode};
    use hifitime::Duration;

    #[test]
    fn default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.min_interval_ms(), 1000);
        assert_eq!(cfg.mode, PositioningMode::Standalone);
    }

    #[test]
    fn tracking_options_power_mode() {
        let cfg = Config::default().with_min_interval(Duration::from_milliseconds(500.0));

        let opts = cfg.tracking_options(PowerMode::Invalid, 2000);
        assert_eq!(opts.min_interval_ms, 500);
        assert!(opts.power.is_none(), "tbm forwarded without power mode");

        let opts = cfg.tracking_options(PowerMode::M4, 2000);
        let power = opts.power.unwrap();
        assert_eq!(power.mode, PowerMode::M4);
        assert_eq!(power.tbm_ms, 2000);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_deserialization() {
        let cfg: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, Config::default());

        let cfg: Config = serde_json::from_str(r#"{"mode": "msb"}"#).unwrap();
        assert_eq!(cfg.mode, PositioningMode::MsBased);
        assert_eq!(cfg.min_interval_ms(), 1000);
    }
}

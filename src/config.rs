//! Process configuration
//!
//! A single battery threshold is read at startup and shared by state-change
//! validation and the battery monitor.

use medifleet_shared::battery;
use tracing::warn;

/// Fleet-wide configuration
#[derive(Debug, Clone)]
pub struct FleetConfig {
    /// Battery percentage below which loading is disallowed and the monitor
    /// flags a drone
    pub battery_threshold: f64,
    /// Interval between battery monitor sweeps, in milliseconds
    pub sweep_interval_ms: u64,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            battery_threshold: battery::DEFAULT_THRESHOLD_PERCENT,
            sweep_interval_ms: battery::SWEEP_INTERVAL_MS,
        }
    }
}

impl FleetConfig {
    /// Read configuration from the environment, falling back to defaults.
    ///
    /// Recognized variables: `MEDIFLEET_BATTERY_THRESHOLD` (percent) and
    /// `MEDIFLEET_SWEEP_INTERVAL_MS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("MEDIFLEET_BATTERY_THRESHOLD") {
            match raw.parse::<f64>() {
                Ok(v) if (0.0..=100.0).contains(&v) => config.battery_threshold = v,
                _ => warn!("Ignoring invalid MEDIFLEET_BATTERY_THRESHOLD: {}", raw),
            }
        }

        if let Ok(raw) = std::env::var("MEDIFLEET_SWEEP_INTERVAL_MS") {
            match raw.parse::<u64>() {
                Ok(v) if v > 0 => config.sweep_interval_ms = v,
                _ => warn!("Ignoring invalid MEDIFLEET_SWEEP_INTERVAL_MS: {}", raw),
            }
        }

        config
    }
}

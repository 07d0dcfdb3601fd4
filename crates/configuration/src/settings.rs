use crate::error::ConfigError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional in `henhouse.toml`; omitted sections fall back
/// to their `Default` implementation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub inventory: InventorySettings,
    #[serde(default)]
    pub notifications: NotificationSettings,
    #[serde(default)]
    pub production: ProductionSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Which threshold rule decides an inventory item's status.
///
/// Only one policy is ever active for a given state container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum ThresholdPolicy {
    /// Critical at or below half the minimum level, warning at or below the minimum.
    #[default]
    MinLevel,
    /// Critical at or below 30% of the optimal level, warning at or below 50%.
    OptimalLevel,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InventorySettings {
    #[serde(default)]
    pub policy: ThresholdPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationSettings {
    /// How many of the most recent notifications are retained.
    #[serde(default = "default_cap")]
    pub cap: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductionSettings {
    /// Fraction of hens expected to lay on a given day (e.g., 0.8 for 80%).
    #[serde(default = "default_lay_rate")]
    pub lay_rate: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    #[serde(default = "default_level")]
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

// --- Default Implementations ---
// This allows a user to omit any section from their toml
// and still have it work with sensible defaults.

fn default_cap() -> usize {
    10
}

fn default_lay_rate() -> Decimal {
    dec!(0.8)
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self { cap: default_cap() }
    }
}

impl Default for ProductionSettings {
    fn default() -> Self {
        Self {
            lay_rate: default_lay_rate(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            directory: None,
        }
    }
}

impl Config {
    /// Checks the values that deserialization alone cannot constrain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.notifications.cap == 0 {
            return Err(ConfigError::Invalid(
                "notifications.cap must be at least 1".to_string(),
            ));
        }
        let lay_rate = self.production.lay_rate;
        if lay_rate <= Decimal::ZERO || lay_rate > Decimal::ONE {
            return Err(ConfigError::Invalid(format!(
                "production.lay_rate must be in (0, 1], got {}",
                lay_rate
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.inventory.policy, ThresholdPolicy::MinLevel);
        assert_eq!(config.notifications.cap, 10);
        assert_eq!(config.production.lay_rate, dec!(0.8));
    }

    #[test]
    fn zero_cap_and_out_of_range_lay_rate_are_rejected() {
        let mut config = Config::default();
        config.notifications.cap = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.production.lay_rate = dec!(1.2);
        assert!(config.validate().is_err());
    }
}


// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use logging::init_logging;
pub use settings::{
    Config, InventorySettings, LoggingSettings, NotificationSettings, ProductionSettings,
    ThresholdPolicy,
};

/// Loads the application configuration.
///
/// Sources are layered in order: built-in defaults, an optional
/// `henhouse.toml` in the working directory, then `HENHOUSE__SECTION__KEY`
/// environment variables (e.g. `HENHOUSE__NOTIFICATIONS__CAP=20`).
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from("henhouse")
}

/// Same as [`load_config`], reading the file named by `file_stem` instead.
pub fn load_config_from(file_stem: &str) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name(file_stem).required(false))
        .add_source(
            config::Environment::with_prefix("HENHOUSE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn missing_file_yields_defaults() {
        let config = load_config_from("henhouse-config-that-does-not-exist").unwrap();
        assert_eq!(config.inventory.policy, ThresholdPolicy::MinLevel);
        assert_eq!(config.notifications.cap, 10);
    }

    #[test]
    fn toml_sections_override_defaults() {
        let dir = std::env::temp_dir().join(format!("henhouse-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("farm.toml");
        std::fs::write(
            &path,
            "[inventory]\npolicy = \"optimal_level\"\n\n[production]\nlay_rate = 0.75\n",
        )
        .unwrap();

        let stem = dir.join("farm");
        let config = load_config_from(stem.to_str().unwrap()).unwrap();
        assert_eq!(config.inventory.policy, ThresholdPolicy::OptimalLevel);
        assert_eq!(config.production.lay_rate, dec!(0.75));
        assert_eq!(config.notifications.cap, 10);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn invalid_values_fail_to_load() {
        let dir = std::env::temp_dir().join(format!("henhouse-invalid-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("farm.toml"), "[notifications]\ncap = 0\n").unwrap();

        let stem = dir.join("farm");
        let result = load_config_from(stem.to_str().unwrap());
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}

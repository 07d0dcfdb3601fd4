use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// `henhouse.toml` or a `HENHOUSE__*` variable could not be read or parsed.
    #[error("Could not read settings: {0}")]
    Load(#[from] config::ConfigError),

    /// A setting parsed but is outside its allowed range.
    #[error("Invalid setting: {0}")]
    Invalid(String),

    #[error("Failed to initialise logging: {0}")]
    Logging(String),
}

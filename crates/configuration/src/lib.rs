use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, FuelEconomyThresholds, RiskBands, RiskScoring};

/// Prefix for environment overrides, e.g. `FLEET__FUEL_ECONOMY__CRITICAL_PCT=25`.
pub const ENV_PREFIX: &str = "FLEET";

/// Loads the application configuration from the `config.toml` file.
///
/// This function is the primary entry point for this crate. A missing file is
/// not an error: every setting has a default.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(Path::new("config.toml"))
}

/// Loads configuration from `path` (optional) layered under `FLEET__*` environment
/// variables, then validates it.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(path = %path.display(), "Configuration loaded.");
    Ok(config)
}

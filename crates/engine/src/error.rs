use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] configuration::error::ConfigError),

    #[error("Risk scoring error: {0}")]
    Risk(#[from] risk::RiskError),

    #[error("Alert store error: {0}")]
    AlertStore(#[from] alerter::AlerterError),
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Risk scoring parameters from configuration are invalid: {0}")]
    InvalidParameters(String),
}

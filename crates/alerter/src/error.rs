use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum AlerterError {
    #[error("Vehicle '{0}' already has an open fuel economy alert.")]
    DuplicateOpenAlert(String),

    #[error("Alert {0} does not exist in the store.")]
    UnknownAlert(Uuid),

    #[error("Alert store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Alert store serialization failed: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

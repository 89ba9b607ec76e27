use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file or a `FLEET__*` variable could not be read or deserialized.
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid [{section}] configuration: {reason}")]
    Invalid { section: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(section: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            section,
            reason: reason.into(),
        }
    }
}

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum SessionError {
    /// User input trimmed to nothing; rejected before any side effect.
    #[error("input is empty")]
    EmptyInput,

    #[error("thread not found: {0}")]
    ThreadNotFound(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for SessionError {
    fn from(e: serde_json::Error) -> Self {
        SessionError::Serialization(e.to_string())
    }
}

use thiserror::Error;

pub type ToolbenchResult<T> = Result<T, ToolbenchError>;

#[derive(Debug, Error)]
pub enum ToolbenchError {
    /// Rejected form input: bad ranges, malformed addresses, empty fields.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ToolbenchError {
    /// Shorthand for building an [`ToolbenchError::InvalidInput`].
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

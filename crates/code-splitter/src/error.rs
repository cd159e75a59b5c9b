use thiserror::Error;

/// Result type for splitter operations
pub type Result<T> = std::result::Result<T, SplitterError>;

/// Errors that can occur while preparing or running a split
#[derive(Error, Debug)]
pub enum SplitterError {
    /// Request is missing a required field or carries an unusable value
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Code text could not be obtained from its source
    #[error("Failed to retrieve code from '{key}': {source}")]
    RetrievalFailure {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SplitterError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a retrieval error for the given object key
    pub fn retrieval(key: impl Into<String>, source: std::io::Error) -> Self {
        Self::RetrievalFailure {
            key: key.into(),
            source,
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Stable name reported in the `errorType` field of an error report
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "InvalidInput",
            Self::RetrievalFailure { .. } => "RetrievalFailure",
            Self::InvalidConfig(_) => "InvalidConfig",
        }
    }
}

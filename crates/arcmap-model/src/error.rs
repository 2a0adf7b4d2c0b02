use thiserror::Error;

/// Errors raised by the matching engine and the dictionary normalizer.
///
/// Every variant is raised synchronously where it is detected; nothing in
/// the engine retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArcmapError {
    /// Invalid or contradictory parameters.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A required column is absent from a source table.
    #[error("schema error: {0}")]
    Schema(String),

    /// The strategy key is not registered.
    #[error("unsupported strategy: {key} (expected one of: {expected})")]
    UnsupportedStrategy { key: String, expected: String },

    /// A numeric argument is out of range or shapes disagree.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The embedding model could not be loaded.
    #[error("embedding model '{model}' is unavailable: {reason}")]
    ModelUnavailable { model: String, reason: String },

    /// The embedding model failed while encoding text.
    #[error("embedding failed with model '{model}': {reason}")]
    Embedding { model: String, reason: String },
}

impl ArcmapError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

pub type Result<T> = std::result::Result<T, ArcmapError>;

use thiserror::Error;

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;

/// Failure kinds surfaced by the query layer.
///
/// Store implementations report failures as [`anyhow::Error`]; the query
/// layer wraps them in [`QueryError::Store`] without altering the message.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A request parameter is missing or malformed.
    #[error("{0}")]
    InvalidArgument(String),

    /// The requested ticker, submission, or fact does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The static ticker dataset could not be loaded.
    #[error("failed to load ticker dataset: {0}")]
    DataLoad(String),

    /// The backing store was unavailable or rejected the query.
    #[error(transparent)]
    Store(#[from] anyhow::Error),

    /// A response could not be produced for reasons unrelated to the store.
    #[error("{0}")]
    Internal(String),
}

impl QueryError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Machine-readable error code used in API error bodies.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::NotFound(_) => "not_found",
            Self::DataLoad(_) => "data_load_error",
            Self::Store(_) => "store_error",
            Self::Internal(_) => "internal",
        }
    }

    /// True for failures caused by the request rather than the service.
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidArgument(_) | Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(QueryError::invalid_argument("x").code(), "invalid_argument");
        assert_eq!(QueryError::not_found("x").code(), "not_found");
        assert_eq!(QueryError::DataLoad("x".into()).code(), "data_load_error");
        assert_eq!(QueryError::from(anyhow::anyhow!("down")).code(), "store_error");
        assert_eq!(QueryError::internal("x").code(), "internal");
    }

    #[test]
    fn test_client_errors() {
        assert!(QueryError::not_found("x").is_client_error());
        assert!(!QueryError::internal("x").is_client_error());
        assert!(!QueryError::from(anyhow::anyhow!("down")).is_client_error());
    }
}

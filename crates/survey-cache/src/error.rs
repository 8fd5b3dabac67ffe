//! Error types for the survey cache

use survey_loader::LoadError;

/// A single key-value write failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot write cache key '{key}': {message}")]
pub struct CacheWriteError {
    /// Key being written
    pub key: String,
    /// Failure description
    pub message: String,
}

impl CacheWriteError {
    /// Create write error for `key`
    pub fn new(key: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self {
            key: key.into(),
            message: message.to_string(),
        }
    }
}

/// Errors that leave the current snapshot in place
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Loading failed as a whole
    #[error("survey reload failed: {0}")]
    Load(#[from] LoadError),

    /// Loaded surveys were refused before going live
    #[error("survey reload rejected: {reason}")]
    Rejected {
        /// Why the surveys were refused
        reason: String,
    },
}

impl StoreError {
    /// Create rejection error
    pub fn rejected(reason: impl std::fmt::Display) -> Self {
        Self::Rejected {
            reason: reason.to_string(),
        }
    }

    /// Check if reload failed on upstream rate limiting
    #[inline]
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Load(err) if err.is_rate_limited())
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

//! Error types for the survey service

use survey_cache::StoreError;
use survey_loader::ConfigError;

/// Survey service errors
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Runtime configuration is invalid
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Reload failed; the previous surveys and schema stay live
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// Check if failure came from upstream rate limiting
    #[inline]
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Store(err) if err.is_rate_limited())
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

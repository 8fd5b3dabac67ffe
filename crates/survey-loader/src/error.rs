//! Error types for survey loading

use chrono::{DateTime, Utc};
use std::fmt::{self, Display, Formatter};

/// Errors raised by a [`SurveySource`](crate::SurveySource)
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Path does not exist in the source
    #[error("not found: {path}")]
    NotFound {
        /// Requested path
        path: String,
    },

    /// Upstream is throttling requests
    #[error("rate limited until {reset_at}")]
    RateLimited {
        /// When the limit resets
        reset_at: DateTime<Utc>,
    },

    /// Request failed, timed out or returned an unexpected status
    #[error("request for '{path}' failed: {message}")]
    Transport {
        /// Requested path
        path: String,
        /// Failure description
        message: String,
    },

    /// Local filesystem error
    #[error("cannot read '{path}': {source}")]
    Io {
        /// Requested path
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Create transport error
    pub fn transport(path: impl Into<String>, message: impl Display) -> Self {
        Self::Transport {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Check if error is a rate limit
    #[inline]
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Reset time when rate limited
    #[must_use]
    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::RateLimited { reset_at } => Some(*reset_at),
            _ => None,
        }
    }
}

/// Malformed YAML in one definition file
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("YAML parse error in '{path}': {message}")]
pub struct YamlParseError {
    /// File path relative to the source root
    pub path: String,
    /// Parser message, with location when known
    pub message: String,
}

/// Errors that abort a whole load
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Upstream throttling; the caller decides on backoff
    #[error("survey source rate limited until {reset_at}")]
    RateLimited {
        /// When the limit resets
        reset_at: DateTime<Utc>,
    },

    /// The source root cannot be listed
    #[error("cannot list survey source: {0}")]
    Source(#[source] FetchError),

    /// Invalid runtime configuration
    #[error("invalid configuration: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl LoadError {
    /// Check if error is a rate limit
    #[inline]
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

impl From<FetchError> for LoadError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::RateLimited { reset_at } => Self::RateLimited { reset_at },
            other => Self::Source(other),
        }
    }
}

/// Result type alias for load operations
pub type LoadResult<T> = Result<T, LoadError>;

/// A recovered problem recorded during a load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadIssue {
    /// Survey directory without a usable `config.yml`; survey skipped
    MissingSurveyConfig {
        /// Survey directory
        survey: String,
    },
    /// File or directory could not be fetched; contributes nothing
    Fetch {
        /// Path relative to the source root
        path: String,
        /// Failure description
        message: String,
    },
    /// File is not valid YAML for its shape; contributes nothing
    Yaml(YamlParseError),
}

impl LoadIssue {
    /// Path the issue is about
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::MissingSurveyConfig { survey } => survey,
            Self::Fetch { path, .. } => path,
            Self::Yaml(err) => &err.path,
        }
    }
}

impl Display for LoadIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSurveyConfig { survey } => {
                write!(f, "survey '{survey}' has no usable config.yml")
            }
            Self::Fetch { path, message } => write!(f, "cannot fetch '{path}': {message}"),
            Self::Yaml(err) => Display::fmt(err, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn rate_limit_converts_to_load_error() {
        let reset_at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let err = LoadError::from(FetchError::RateLimited { reset_at });
        assert!(err.is_rate_limited());
        assert!(matches!(err, LoadError::RateLimited { reset_at: r } if r == reset_at));
    }

    #[test]
    fn other_fetch_errors_are_source_errors() {
        let err = LoadError::from(FetchError::NotFound { path: "x".into() });
        assert!(matches!(err, LoadError::Source(FetchError::NotFound { .. })));
    }

    #[test]
    fn issue_path() {
        let issue = LoadIssue::Yaml(YamlParseError {
            path: "s/e/questions.yml".into(),
            message: "bad".into(),
        });
        assert_eq!(issue.path(), "s/e/questions.yml");
        assert_eq!(issue.to_string(), "YAML parse error in 's/e/questions.yml': bad");
    }
}

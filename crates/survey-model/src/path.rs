//! Storage paths for addressing response fields
//!
//! Provides [`StoragePath`] for hierarchical addressing of fields inside a
//! response document, and [`DbSuffix`] for the derived representations of a
//! response (raw answer, normalized answer, patterns, ...).

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Separator used by dotted (structured document) paths
pub const DOTTED_SEPARATOR: &str = ".";

/// Separator used by flat (raw ingestion) field names
pub const FLAT_SEPARATOR: &str = "__";

/// Path within a response document
///
/// Renders two ways:
/// - dotted, for structured-document addressing: `usage.satisfaction.raw`
/// - flat, for raw ingestion field names: `usage__satisfaction__raw`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StoragePath(Vec<String>);

impl StoragePath {
    /// Create path from already validated segments
    #[inline]
    #[must_use]
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Build a path, validating every segment
    ///
    /// # Errors
    /// Returns [`PathError`] if a segment is empty or contains a separator.
    pub fn try_from_segments<I, S>(segments: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments = segments
            .into_iter()
            .map(|segment| validate_segment(segment.into()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(segments))
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Get number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if path has no segments
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get last segment
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Append a suffix, returning new path
    #[inline]
    #[must_use]
    pub fn child(&self, suffix: DbSuffix) -> Self {
        let mut new = self.clone();
        new.0.push(suffix.as_str().to_string());
        new
    }

    /// Check if this path is a prefix of another
    #[inline]
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        self.0.len() <= other.0.len() && self.0 == other.0[..self.0.len()]
    }

    /// Dotted rendering (`section.question.suffix`)
    #[inline]
    #[must_use]
    pub fn dotted(&self) -> String {
        self.0.join(DOTTED_SEPARATOR)
    }

    /// Flat rendering (`section__question__suffix`)
    #[inline]
    #[must_use]
    pub fn flat(&self) -> String {
        self.0.join(FLAT_SEPARATOR)
    }
}

impl Display for StoragePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dotted())
    }
}

impl FromStr for StoragePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from_segments(s.split('.'))
    }
}

fn validate_segment(segment: String) -> Result<String, PathError> {
    if segment.is_empty() {
        Err(PathError::EmptySegment)
    } else if segment.contains('.') || segment.chars().any(char::is_whitespace) {
        Err(PathError::InvalidSegment(segment))
    } else {
        Ok(segment)
    }
}

/// Derived representation of a response addressed by a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DbSuffix {
    /// Answer as submitted
    Raw,
    /// Normalization patterns matched
    Patterns,
    /// Normalization error
    Error,
    /// Normalized answer
    Normalized,
    /// Predefined choice(s) picked
    Choices,
    /// Free-text "other" answers
    Others,
    /// Experience level for features and tools
    Experience,
    /// Free-text comment attached to a question
    Comment,
}

impl DbSuffix {
    /// Every suffix, in declaration order
    pub const ALL: [Self; 8] = [
        Self::Raw,
        Self::Patterns,
        Self::Error,
        Self::Normalized,
        Self::Choices,
        Self::Others,
        Self::Experience,
        Self::Comment,
    ];

    /// Path segment for this suffix
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Patterns => "patterns",
            Self::Error => "error",
            Self::Normalized => "normalized",
            Self::Choices => "choices",
            Self::Others => "others",
            Self::Experience => "experience",
            Self::Comment => "comment",
        }
    }
}

impl Display for DbSuffix {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors related to storage paths
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Empty segment in path
    #[error("path contains empty segment")]
    EmptySegment,

    /// Segment contains a separator or whitespace
    #[error("invalid path segment: '{0}'")]
    InvalidSegment(String),
}

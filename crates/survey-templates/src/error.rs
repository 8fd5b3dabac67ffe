//! Error types for template application

use survey_model::PathError;

/// Errors raised while compiling questions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// Question declares no id
    #[error("question #{index} in section '{section}' has no id")]
    MissingId {
        /// Section holding the question
        section: String,
        /// Position of the question in its section
        index: usize,
    },

    /// Question names a template that is not registered
    #[error("unknown template '{name}' for question '{question}' in section '{section}'")]
    UnknownTemplate {
        /// Template name as written
        name: String,
        /// Section holding the question
        section: String,
        /// Question id, or `#<index>` when it has none
        question: String,
    },

    /// Section or question id cannot form a storage path
    #[error("invalid storage path for question '{question}' in section '{section}': {source}")]
    Path {
        /// Section holding the question
        section: String,
        /// Question id
        question: String,
        /// Underlying path error
        #[source]
        source: PathError,
    },

    /// Option id cannot be used as a schema enum value
    #[error("option '{option}' of question '{question}' in section '{section}' is not a valid enum value")]
    InvalidOption {
        /// Section holding the question
        section: String,
        /// Question id
        question: String,
        /// Offending option id
        option: String,
    },

    /// Two questions of an edition resolve to the same storage path
    #[error("path collision on '{path}' between questions '{first}' and '{second}' in section '{section}'")]
    PathCollision {
        /// Section holding the second question
        section: String,
        /// Colliding path
        path: String,
        /// Question that claimed the path first
        first: String,
        /// Question that claimed it again
        second: String,
    },

    /// Two questions of one edition share an id
    #[error("question '{question}' declared in both section '{first_section}' and section '{second_section}'")]
    DuplicateQuestion {
        /// Shared question id
        question: String,
        /// Section declaring it first
        first_section: String,
        /// Section declaring it again
        second_section: String,
    },
}

impl TemplateError {
    /// Create path error for question
    pub fn path(section: impl Into<String>, question: impl Into<String>, source: PathError) -> Self {
        Self::Path {
            section: section.into(),
            question: question.into(),
            source,
        }
    }

    /// Whether the error must abort compilation instead of skipping a question
    #[inline]
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::PathCollision { .. } | Self::DuplicateQuestion { .. }
        )
    }
}

/// Result type alias for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_id_display() {
        let err = TemplateError::MissingId {
            section: "usage".to_string(),
            index: 2,
        };
        assert_eq!(err.to_string(), "question #2 in section 'usage' has no id");
    }

    #[test]
    fn only_conflicts_are_fatal() {
        let collision = TemplateError::PathCollision {
            section: "s".into(),
            path: "s.q".into(),
            first: "q".into(),
            second: "q".into(),
        };
        assert!(collision.is_fatal());
        let duplicate = TemplateError::DuplicateQuestion {
            question: "q".into(),
            first_section: "a".into(),
            second_section: "b".into(),
        };
        assert!(duplicate.is_fatal());
        assert!(!TemplateError::path("s", "q", PathError::EmptySegment).is_fatal());
    }
}

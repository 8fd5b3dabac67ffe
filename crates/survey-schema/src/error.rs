//! Error types for schema assembly

use survey_templates::TemplateError;

/// Errors that abort schema assembly
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Two fragments define the same type
    #[error("type '{type_name}' defined by both {first} and {second}")]
    TypeNameCollision {
        /// Colliding type name
        type_name: String,
        /// Origin of the fragment that was accepted
        first: String,
        /// Origin of the fragment that was rejected
        second: String,
    },

    /// Two questions of an edition share a storage path or an id
    #[error("survey '{survey}', edition '{edition}': {source}")]
    QuestionConflict {
        /// Survey being compiled
        survey: String,
        /// Edition holding both questions
        edition: String,
        /// Underlying conflict
        #[source]
        source: TemplateError,
    },
}

impl SchemaError {
    /// Create type-name collision error
    pub fn collision(
        type_name: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self::TypeNameCollision {
            type_name: type_name.into(),
            first: first.into(),
            second: second.into(),
        }
    }
}

/// Result type alias for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collision_names_both_origins() {
        let err = SchemaError::collision("Surveys", "aggregate", "survey 'x'");
        assert_eq!(
            err.to_string(),
            "type 'Surveys' defined by both aggregate and survey 'x'"
        );
    }
}

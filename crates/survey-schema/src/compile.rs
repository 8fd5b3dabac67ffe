//! Survey-wide compilation
//!
//! Walks surveys, editions, sections and questions in source order, merges
//! each survey's questions across editions and assembles the resulting
//! fragments into one document.

use crate::assembler::SchemaAssembler;
use crate::error::{SchemaError, SchemaResult};
use crate::fragment::SchemaDocument;
use crate::generate::{
    generate_edition_id_enum, generate_enum_type, generate_option_type, generate_surveys_type,
};
use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use survey_model::{QuestionOption, Survey};
use survey_templates::{compile_edition, QuestionTemplateOutput, TemplateError, TemplateRegistry};
use tracing::{debug, info};

/// Option field listing the editions an option appears in
pub const OPTION_EDITIONS_FIELD: &str = "editions";

/// A question merged across the editions of its survey
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledQuestion {
    /// Descriptor from the first edition defining the question
    #[serde(flatten)]
    pub output: QuestionTemplateOutput,
    /// Editions containing the question, in source order
    pub editions: Vec<String>,
}

/// Question skipped during compilation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIssue {
    /// Survey holding the question
    pub survey: String,
    /// Edition holding the question
    pub edition: String,
    /// Why it was skipped
    pub error: TemplateError,
}

/// Result of [`compile_schema`]
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    /// Assembled type definitions
    pub document: SchemaDocument,
    /// Merged questions, surveys in input order
    pub questions: Vec<CompiledQuestion>,
    /// Questions that could not be compiled
    pub issues: Vec<SchemaIssue>,
}

/// Compile every survey into a schema document
///
/// Question ids are unique within an edition. Across editions, questions
/// are merged per survey by id: the first definition wins, while options
/// are unioned and annotated with the editions they appear in. Malformed
/// questions, including options that cannot be enum values, are skipped
/// and reported in [`CompiledSchema::issues`].
///
/// # Errors
/// - [`SchemaError::QuestionConflict`] when two questions of an edition
///   share a path or an id
/// - [`SchemaError::TypeNameCollision`] when two fragments share a name
pub fn compile_schema(surveys: &[Survey], registry: &TemplateRegistry) -> SchemaResult<CompiledSchema> {
    let mut assembler = SchemaAssembler::new();
    let mut questions = Vec::new();
    let mut issues = Vec::new();

    for survey in surveys {
        let merged = merge_survey(survey, registry, &mut issues)?;

        assembler.extend(generate_edition_id_enum(survey))?;
        for question in merged.values() {
            assembler.extend(generate_enum_type(&question.output))?;
            assembler.extend(generate_option_type(&question.output))?;
        }

        debug!(survey = %survey.id, questions = merged.len(), "compiled survey");
        questions.extend(merged.into_values());
    }

    assembler.push(generate_surveys_type(surveys))?;
    let document = assembler.finish();

    info!(
        surveys = surveys.len(),
        questions = questions.len(),
        types = document.len(),
        skipped = issues.len(),
        "compiled schema"
    );

    Ok(CompiledSchema {
        document,
        questions,
        issues,
    })
}

fn merge_survey(
    survey: &Survey,
    registry: &TemplateRegistry,
    issues: &mut Vec<SchemaIssue>,
) -> SchemaResult<IndexMap<String, CompiledQuestion>> {
    let mut merged: IndexMap<String, CompiledQuestion> = IndexMap::new();

    for edition in &survey.editions {
        let output = compile_edition(registry, survey, edition).map_err(|source| {
            SchemaError::QuestionConflict {
                survey: survey.id.clone(),
                edition: edition.id.clone(),
                source,
            }
        })?;

        issues.extend(output.issues.into_iter().map(|error| SchemaIssue {
            survey: survey.id.clone(),
            edition: edition.id.clone(),
            error,
        }));

        for question in output.questions {
            merge_question(&mut merged, question, &edition.id);
        }
    }

    Ok(merged)
}

fn merge_question(
    merged: &mut IndexMap<String, CompiledQuestion>,
    mut question: QuestionTemplateOutput,
    edition_id: &str,
) {
    match merged.entry(question.id.clone()) {
        Entry::Vacant(slot) => {
            for option in question.options.iter_mut().flatten() {
                annotate(option, edition_id);
            }
            slot.insert(CompiledQuestion {
                output: question,
                editions: vec![edition_id.to_string()],
            });
        }
        Entry::Occupied(mut slot) => {
            let existing = slot.get_mut();
            if !existing.editions.iter().any(|e| e == edition_id) {
                existing.editions.push(edition_id.to_string());
            }
            let (Some(known), Some(incoming)) = (existing.output.options.as_mut(), question.options)
            else {
                return;
            };
            for mut option in incoming {
                match known.iter_mut().find(|k| k.id == option.id) {
                    Some(found) => annotate(found, edition_id),
                    None => {
                        annotate(&mut option, edition_id);
                        known.push(option);
                    }
                }
            }
        }
    }
}

fn annotate(option: &mut QuestionOption, edition_id: &str) {
    let editions = option
        .fields
        .entry(OPTION_EDITIONS_FIELD)
        .or_insert_with(|| Value::Array(Vec::new()));
    if let Value::Array(list) = editions {
        if !list.iter().any(|v| v.as_str() == Some(edition_id)) {
            list.push(Value::String(edition_id.to_string()));
        }
    }
}

//! Section and edition compilation
//!
//! Applies the registry to every question of a section, keeping going past
//! malformed questions and refusing sections whose questions share a path.
//! [`compile_edition`] runs the same checks across all sections of an
//! edition, where question ids must also be unique.

use crate::error::{TemplateError, TemplateResult};
use crate::output::{QuestionTemplateOutput, TemplateContext};
use crate::registry::TemplateRegistry;
use std::collections::HashMap;
use survey_model::{Edition, Section, Survey};
use tracing::{debug, warn};

/// Compiled questions of one section
#[derive(Debug, Clone, Default)]
pub struct SectionOutput {
    /// Compiled questions, in declaration order
    pub questions: Vec<QuestionTemplateOutput>,
    /// Questions skipped and why
    pub issues: Vec<TemplateError>,
}

/// Compile every question of `section`
///
/// Questions with a missing id, an unknown template or an invalid path are
/// skipped and reported in [`SectionOutput::issues`].
///
/// # Errors
/// Returns [`TemplateError::PathCollision`] when two questions of the
/// section claim the same storage path.
pub fn compile_section(
    registry: &TemplateRegistry,
    survey: &Survey,
    edition: &Edition,
    section: &Section,
) -> TemplateResult<SectionOutput> {
    let mut output = SectionOutput::default();
    let mut claimed: HashMap<String, String> = HashMap::new();

    for (index, question) in section.questions.iter().enumerate() {
        let ctx = TemplateContext::new(survey, edition, section, question, index);
        let compiled = match registry.apply(&ctx) {
            Ok(compiled) => compiled,
            Err(err) => {
                warn!(
                    survey = %survey.id,
                    edition = %edition.id,
                    section = %section.id,
                    error = %err,
                    "skipping question"
                );
                output.issues.push(err);
                continue;
            }
        };

        for path in compiled.claimed_paths() {
            if let Some(first) = claimed.get(path) {
                return Err(TemplateError::PathCollision {
                    section: section.id.clone(),
                    path: path.to_string(),
                    first: first.clone(),
                    second: compiled.id.clone(),
                });
            }
        }
        for path in compiled.claimed_paths() {
            claimed.insert(path.to_string(), compiled.id.clone());
        }

        output.questions.push(compiled);
    }

    debug!(
        section = %section.id,
        questions = output.questions.len(),
        skipped = output.issues.len(),
        "compiled section"
    );
    Ok(output)
}

/// Compiled questions of one edition
#[derive(Debug, Clone, Default)]
pub struct EditionOutput {
    /// Compiled questions, form sections then API sections
    pub questions: Vec<QuestionTemplateOutput>,
    /// Questions skipped and why
    pub issues: Vec<TemplateError>,
}

/// Compile every section of `edition`
///
/// # Errors
/// - [`TemplateError::PathCollision`] when two questions of the edition
///   claim the same storage path, in the same section or not
/// - [`TemplateError::DuplicateQuestion`] when two questions of the edition
///   share an id
pub fn compile_edition(
    registry: &TemplateRegistry,
    survey: &Survey,
    edition: &Edition,
) -> TemplateResult<EditionOutput> {
    let mut output = EditionOutput::default();
    let mut sections_by_id: HashMap<String, String> = HashMap::new();
    let mut claimed: HashMap<String, String> = HashMap::new();

    for section in edition.all_sections() {
        let compiled = compile_section(registry, survey, edition, section)?;

        for question in &compiled.questions {
            let owner = format!("{}.{}", section.id, question.id);
            for path in question.claimed_paths() {
                if let Some(first) = claimed.get(path) {
                    return Err(TemplateError::PathCollision {
                        section: section.id.clone(),
                        path: path.to_string(),
                        first: first.clone(),
                        second: owner,
                    });
                }
            }
            if let Some(first_section) = sections_by_id.get(&question.id) {
                return Err(TemplateError::DuplicateQuestion {
                    question: question.id.clone(),
                    first_section: first_section.clone(),
                    second_section: section.id.clone(),
                });
            }

            for path in question.claimed_paths() {
                claimed.insert(path.to_string(), owner.clone());
            }
            sections_by_id.insert(question.id.clone(), section.id.clone());
        }

        output.questions.extend(compiled.questions);
        output.issues.extend(compiled.issues);
    }

    Ok(output)
}

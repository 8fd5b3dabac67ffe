//! Template inputs and compiled question descriptors

use crate::kind::TemplateKind;
use serde::Serialize;
use survey_model::{Edition, Fields, Question, QuestionOption, Section, Survey};

/// Everything a template may look at
#[derive(Debug, Clone, Copy)]
pub struct TemplateContext<'a> {
    /// Survey being compiled
    pub survey: &'a Survey,
    /// Edition holding the section
    pub edition: &'a Edition,
    /// Section holding the question
    pub section: &'a Section,
    /// Question declaration
    pub question: &'a Question,
    /// Position of the question in its section
    pub index: usize,
}

impl<'a> TemplateContext<'a> {
    /// Create context for the `index`-th question of `section`
    #[inline]
    #[must_use]
    pub fn new(
        survey: &'a Survey,
        edition: &'a Edition,
        section: &'a Section,
        question: &'a Question,
        index: usize,
    ) -> Self {
        Self {
            survey,
            edition,
            section,
            question,
            index,
        }
    }

    /// Question id, or `#<index>` for messages about id-less questions
    #[must_use]
    pub fn question_label(&self) -> String {
        self.question
            .id
            .clone()
            .unwrap_or_else(|| format!("#{}", self.index))
    }
}

/// Flat field names used at raw ingestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawPaths {
    /// Main answer field
    pub response: String,
    /// Free-text "other" answer field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other: Option<String>,
    /// Comment field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Dotted paths inside normalized response documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormPaths {
    /// Main answer path
    pub response: String,
    /// Raw free-text answer kept next to its normalized form
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    /// Normalization patterns matched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patterns: Option<String>,
    /// Normalization error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Normalized "other" answer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other: Option<String>,
    /// Comment path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Compiled descriptor for one question
///
/// Consumed both by storage-path resolution and by schema generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionTemplateOutput {
    /// Question id
    pub id: String,
    /// Template that produced this output
    pub template: TemplateKind,
    /// Owning survey id
    pub survey_id: String,
    /// Owning section id
    pub section_id: String,
    /// Flat field names
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_paths: Option<RawPaths>,
    /// Dotted paths
    #[serde(skip_serializing_if = "Option::is_none")]
    pub norm_paths: Option<NormPaths>,
    /// Generated option type name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option_type_name: Option<String>,
    /// Generated option-id enum name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_type_name: Option<String>,
    /// Effective options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<QuestionOption>>,
    /// Whether option ids are numbers
    pub options_are_numeric: bool,
    /// Several options may be picked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_multiple: Option<bool>,
    /// A free-text "other" answer is accepted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_other: Option<bool>,
    /// Only visible through the generated schema
    pub api_only: bool,
    /// Base shape the question extends
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    /// Fields carried over from the declaration
    #[serde(flatten)]
    pub fields: Fields,
}

impl QuestionTemplateOutput {
    /// Every dotted path and flat field name this question claims
    #[must_use]
    pub fn claimed_paths(&self) -> Vec<&str> {
        let mut paths = Vec::new();
        if let Some(raw) = &self.raw_paths {
            paths.push(raw.response.as_str());
            paths.extend(raw.other.as_deref());
            paths.extend(raw.comment.as_deref());
        }
        if let Some(norm) = &self.norm_paths {
            paths.push(norm.response.as_str());
            for path in [&norm.raw, &norm.patterns, &norm.error, &norm.other, &norm.comment] {
                paths.extend(path.as_deref());
            }
        }
        paths
    }

    /// Whether the question has a non-empty option list
    #[inline]
    #[must_use]
    pub fn has_options(&self) -> bool {
        self.options.as_ref().is_some_and(|o| !o.is_empty())
    }
}

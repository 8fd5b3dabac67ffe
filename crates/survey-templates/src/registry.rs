//! Template registry
//!
//! Provides [`TemplateRegistry`], a table binding every [`TemplateKind`] to
//! one pure template function. Dispatch is by exact template name; unknown
//! names are an explicit error.

use crate::error::{TemplateError, TemplateResult};
use crate::kind::TemplateKind;
use crate::output::{QuestionTemplateOutput, TemplateContext};
use crate::templates;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Signature shared by every template
pub type TemplateFn = fn(&TemplateContext<'_>) -> TemplateResult<QuestionTemplateOutput>;

static BUILTIN: Lazy<TemplateRegistry> = Lazy::new(TemplateRegistry::with_defaults);

/// Registry of template functions keyed by kind
#[derive(Debug, Default, Clone)]
pub struct TemplateRegistry {
    table: HashMap<TemplateKind, TemplateFn>,
}

impl TemplateRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// Shared registry holding the built-in templates
    #[inline]
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Create registry with built-in templates
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(TemplateKind::Default, templates::default);
        registry.register(TemplateKind::Multiple, templates::multiple);
        registry.register(TemplateKind::Single, templates::single);
        registry.register(TemplateKind::Dropdown, templates::dropdown);
        registry.register(TemplateKind::Number, templates::number);
        registry.register(TemplateKind::Slider, templates::slider);
        registry.register(TemplateKind::Others, templates::others);
        registry.register(TemplateKind::Project, templates::project);
        registry.register(TemplateKind::Happiness, templates::happiness);
        registry.register(TemplateKind::Opinion, templates::opinion);
        registry.register(TemplateKind::Feature, templates::feature);
        registry.register(TemplateKind::Tool, templates::tool);
        registry.register(TemplateKind::AllFeatures, templates::all_features);
        registry.register(TemplateKind::AllTools, templates::all_tools);
        registry.register(TemplateKind::SectionTools, templates::section_tools);
        registry.register(TemplateKind::SectionToolsRatios, templates::section_tools_ratios);
        registry.register(TemplateKind::CompletionStats, templates::completion_stats);
        registry.register(TemplateKind::KnowledgeScore, templates::knowledge_score);
        registry.register(TemplateKind::Source, templates::source);
        registry.register(TemplateKind::Country, templates::country);
        registry.register(TemplateKind::DataExplorer, templates::data_explorer);
        registry
    }

    /// Register a template function, returning the one it replaces
    pub fn register(&mut self, kind: TemplateKind, template: TemplateFn) -> Option<TemplateFn> {
        self.table.insert(kind, template)
    }

    /// Get the function bound to `kind`
    #[inline]
    #[must_use]
    pub fn get(&self, kind: TemplateKind) -> Option<TemplateFn> {
        self.table.get(&kind).copied()
    }

    /// Check if kind is registered
    #[inline]
    #[must_use]
    pub fn contains(&self, kind: TemplateKind) -> bool {
        self.table.contains_key(&kind)
    }

    /// Registered kinds in catalog order
    #[must_use]
    pub fn kinds(&self) -> Vec<TemplateKind> {
        TemplateKind::ALL
            .into_iter()
            .filter(|kind| self.contains(*kind))
            .collect()
    }

    /// Get number of registered templates
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Resolve the question's template by name and apply it
    ///
    /// A question without a template uses `default`.
    ///
    /// # Errors
    /// - `TemplateError::UnknownTemplate` for unregistered names
    /// - whatever the template itself reports (`MissingId`, `Path`)
    pub fn apply(&self, ctx: &TemplateContext<'_>) -> TemplateResult<QuestionTemplateOutput> {
        let name = ctx
            .question
            .template
            .as_deref()
            .unwrap_or(TemplateKind::Default.as_str());

        let template = TemplateKind::from_name(name)
            .and_then(|kind| self.get(kind))
            .ok_or_else(|| TemplateError::UnknownTemplate {
                name: name.to_string(),
                section: ctx.section.id.clone(),
                question: ctx.question_label(),
            })?;

        template(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_model::{Edition, Fields, Question, Section, Survey};

    fn fixture(question: Question) -> (Survey, Edition, Section) {
        let section = Section {
            id: "usage".into(),
            slug: None,
            template: None,
            questions: vec![question],
            fields: Fields::new(),
        };
        let edition = Edition {
            id: "js2023".into(),
            year: Some(2023),
            sections: vec![section.clone()],
            api_sections: vec![],
            fields: Fields::new(),
        };
        let survey = Survey {
            id: "state_of_js".into(),
            name: None,
            editions: vec![],
            fields: Fields::new(),
        };
        (survey, edition, section)
    }

    #[test]
    fn registry_new_empty() {
        let registry = TemplateRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn registry_with_defaults_covers_catalog() {
        let registry = TemplateRegistry::with_defaults();
        assert_eq!(registry.len(), TemplateKind::ALL.len());
        assert_eq!(registry.kinds(), TemplateKind::ALL.to_vec());
    }

    #[test]
    fn builtin_is_shared() {
        assert!(std::ptr::eq(TemplateRegistry::builtin(), TemplateRegistry::builtin()));
        assert!(TemplateRegistry::builtin().contains(TemplateKind::Multiple));
    }

    #[test]
    fn register_replaces() {
        let mut registry = TemplateRegistry::with_defaults();
        let previous = registry.register(TemplateKind::Single, templates::dropdown);
        assert!(previous.is_some());
        assert_eq!(registry.len(), TemplateKind::ALL.len());
    }

    #[test]
    fn unknown_template_is_an_error() {
        let (survey, edition, section) = fixture(Question::new("q1", "sparkline"));
        let ctx = TemplateContext::new(&survey, &edition, &section, &section.questions[0], 0);

        let err = TemplateRegistry::builtin().apply(&ctx).unwrap_err();
        assert_eq!(
            err,
            TemplateError::UnknownTemplate {
                name: "sparkline".into(),
                section: "usage".into(),
                question: "q1".into(),
            }
        );
    }

    #[test]
    fn unregistered_kind_is_unknown() {
        let (survey, edition, section) = fixture(Question::new("q1", "single"));
        let ctx = TemplateContext::new(&survey, &edition, &section, &section.questions[0], 0);

        let err = TemplateRegistry::new().apply(&ctx).unwrap_err();
        assert!(matches!(err, TemplateError::UnknownTemplate { .. }));
    }

    #[test]
    fn missing_template_uses_default() {
        let question = Question {
            id: Some("age".into()),
            ..Question::default()
        };
        let (survey, edition, section) = fixture(question);
        let ctx = TemplateContext::new(&survey, &edition, &section, &section.questions[0], 0);

        let output = TemplateRegistry::builtin().apply(&ctx).unwrap();
        assert_eq!(output.template, TemplateKind::Default);
        assert_eq!(output.raw_paths.unwrap().response, "usage__age");
    }
}

//! Survey definition entities
//!
//! Surveys own editions, editions own sections, sections own questions.
//! Every entity keeps the fields it does not model explicitly in an ordered
//! `fields` map, so definitions round-trip into caches unchanged.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Free-form fields carried alongside the modelled ones
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// A recurring research project with yearly editions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    /// Survey identifier (`state_of_js`)
    pub id: String,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Editions in source listing order
    #[serde(default)]
    pub editions: Vec<Edition>,
    /// Remaining base-config fields
    #[serde(flatten)]
    pub fields: Fields,
}

impl Survey {
    /// Build a survey from its base config and loaded editions
    ///
    /// `fallback_id` is used when the config does not name the survey.
    #[must_use]
    pub fn from_config(fallback_id: &str, config: SurveyConfig, editions: Vec<Edition>) -> Self {
        let SurveyConfig { id, name, mut fields } = config;
        fields.remove("editions");
        Self {
            id: id.unwrap_or_else(|| fallback_id.to_string()),
            name,
            editions,
            fields,
        }
    }

    /// Look up an edition by id
    #[must_use]
    pub fn edition(&self, edition_id: &str) -> Option<&Edition> {
        self.editions.iter().find(|e| e.id == edition_id)
    }

    /// Edition-level fields merged on top of the survey-level fields
    ///
    /// Shallow merge: a key present on the edition replaces the survey's.
    #[must_use]
    pub fn edition_config(&self, edition: &Edition) -> Fields {
        let mut merged = self.fields.clone();
        if let Some(name) = &self.name {
            merged.insert("name".to_string(), name.clone().into());
        }
        merged.insert("surveyId".to_string(), self.id.clone().into());
        merged.insert("editionId".to_string(), edition.id.clone().into());
        if let Some(year) = edition.year {
            merged.insert("year".to_string(), year.into());
        }
        for (key, value) in &edition.fields {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }
}

/// Survey-level `config.yml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveyConfig {
    /// Survey identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Remaining fields
    #[serde(flatten)]
    pub fields: Fields,
}

/// One yearly run of a survey
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edition {
    /// Edition identifier (`js2023`)
    pub id: String,
    /// Year the edition ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    /// Form-facing outline from `questions.yml`
    #[serde(default)]
    pub sections: Vec<Section>,
    /// API-only additions from `api.yml`
    #[serde(default)]
    pub api_sections: Vec<Section>,
    /// Remaining edition-level config fields
    #[serde(flatten)]
    pub fields: Fields,
}

impl Edition {
    /// Build an edition from its config and outlines
    ///
    /// `api_sections` have every question stamped `apiOnly`.
    #[must_use]
    pub fn from_config(
        fallback_id: &str,
        config: EditionConfig,
        sections: Vec<Section>,
        mut api_sections: Vec<Section>,
    ) -> Self {
        let EditionConfig { id, year, mut fields } = config;
        fields.remove("sections");
        fields.remove("apiSections");
        for section in &mut api_sections {
            section.stamp_api_only();
        }
        Self {
            id: id.unwrap_or_else(|| fallback_id.to_string()),
            year,
            sections,
            api_sections,
            fields,
        }
    }

    /// Form sections followed by API-only sections
    pub fn all_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().chain(&self.api_sections)
    }

    /// Number of questions across form and API sections
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.all_sections().map(|s| s.questions.len()).sum()
    }
}

/// Edition-level `config.yml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditionConfig {
    /// Edition identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Year the edition ran
    #[serde(default)]
    pub year: Option<u32>,
    /// Remaining fields
    #[serde(flatten)]
    pub fields: Fields,
}

/// Group of related questions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Section identifier
    pub id: String,
    /// Storage segment override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Section template (`tool`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Questions in outline order
    #[serde(default)]
    pub questions: Vec<Question>,
    /// Remaining fields
    #[serde(flatten)]
    pub fields: Fields,
}

impl Section {
    /// Storage segment: slug when set, id otherwise
    #[inline]
    #[must_use]
    pub fn segment(&self) -> &str {
        self.slug.as_deref().unwrap_or(&self.id)
    }

    /// Check the section template by name
    #[inline]
    #[must_use]
    pub fn has_template(&self, name: &str) -> bool {
        self.template.as_deref() == Some(name)
    }

    /// Flag every question as visible only through the API
    pub fn stamp_api_only(&mut self) {
        for question in &mut self.questions {
            question.api_only = Some(true);
        }
    }
}

/// A question declaration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Question identifier; required by every template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Template name; `default` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Predefined options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<QuestionOption>>,
    /// Whether option ids are numbers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options_are_numeric: Option<bool>,
    /// Several options may be picked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_multiple: Option<bool>,
    /// A free-text "other" answer is accepted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_other: Option<bool>,
    /// Only visible through the generated schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_only: Option<bool>,
    /// Base shape the question extends
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    /// Remaining fields
    #[serde(flatten)]
    pub fields: Fields,
}

impl Question {
    /// Create a question with id and template
    #[must_use]
    pub fn new(id: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            template: Some(template.into()),
            ..Self::default()
        }
    }

    /// With options
    #[inline]
    #[must_use]
    pub fn with_options(mut self, options: Vec<QuestionOption>) -> Self {
        self.options = Some(options);
        self
    }

    /// Whether the question is API-only
    #[inline]
    #[must_use]
    pub fn is_api_only(&self) -> bool {
        self.api_only.unwrap_or(false)
    }
}

/// A selectable value of a choice question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOption {
    /// Option identifier
    pub id: OptionId,
    /// Display label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Per-edition average statistic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average: Option<f64>,
    /// Referenced entity id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    /// Remaining fields
    #[serde(flatten)]
    pub fields: Fields,
}

impl QuestionOption {
    /// Create option with id only
    #[must_use]
    pub fn new(id: impl Into<OptionId>) -> Self {
        Self {
            id: id.into(),
            label: None,
            average: None,
            entity: None,
            fields: Fields::new(),
        }
    }

    /// With average
    #[inline]
    #[must_use]
    pub fn with_average(mut self, average: f64) -> Self {
        self.average = Some(average);
        self
    }
}

/// Option identifier: YAML allows both `yes` and `3`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionId {
    /// Integer id
    Integer(i64),
    /// Fractional id
    Float(f64),
    /// Textual id
    Text(String),
}

impl OptionId {
    /// Whether the id is a number
    #[inline]
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Self::Text(_))
    }
}

impl Display for OptionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for OptionId {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for OptionId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for OptionId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn question_yaml_keeps_extra_fields() {
        let question: Question = serde_yaml::from_str(
            r"
id: tshirt_size
template: single
allowOther: true
options:
  - id: s
  - id: 3
    average: 2.5
i18nNamespace: sizes
",
        )
        .unwrap();

        assert_eq!(question.id.as_deref(), Some("tshirt_size"));
        assert_eq!(question.allow_other, Some(true));
        let options = question.options.as_ref().unwrap();
        assert_eq!(options[0].id, OptionId::Text("s".into()));
        assert_eq!(options[1].id, OptionId::Integer(3));
        assert_eq!(options[1].average, Some(2.5));
        assert_eq!(question.fields["i18nNamespace"], "sizes");
    }

    #[test]
    fn section_requires_id() {
        let result: Result<Section, _> = serde_yaml::from_str("questions: []");
        assert!(result.is_err());
    }

    #[test]
    fn section_segment_prefers_slug() {
        let mut section: Section = serde_yaml::from_str("id: other_tools").unwrap();
        assert_eq!(section.segment(), "other_tools");
        section.slug = Some("tools_misc".into());
        assert_eq!(section.segment(), "tools_misc");
    }

    #[test]
    fn edition_stamps_api_sections() {
        let api: Vec<Section> = serde_yaml::from_str(
            r"
- id: extra
  questions:
    - id: computed
      template: completion_stats
",
        )
        .unwrap();
        let edition = Edition::from_config("js2023", EditionConfig::default(), vec![], api);

        assert_eq!(edition.id, "js2023");
        assert!(edition.api_sections[0].questions[0].is_api_only());
        assert_eq!(edition.question_count(), 1);
    }

    #[test]
    fn survey_config_id_wins_over_directory() {
        let config = SurveyConfig {
            id: Some("state_of_js".into()),
            ..SurveyConfig::default()
        };
        let survey = Survey::from_config("dir_name", config, vec![]);
        assert_eq!(survey.id, "state_of_js");

        let survey = Survey::from_config("dir_name", SurveyConfig::default(), vec![]);
        assert_eq!(survey.id, "dir_name");
    }

    #[test]
    fn edition_config_overrides_survey_fields() {
        let mut survey_fields = Fields::new();
        survey_fields.insert("hashtag".into(), "stateofjs".into());
        survey_fields.insert("color".into(), "yellow".into());
        let mut edition_fields = Fields::new();
        edition_fields.insert("color".into(), "blue".into());

        let edition = Edition {
            id: "js2023".into(),
            year: Some(2023),
            sections: vec![],
            api_sections: vec![],
            fields: edition_fields,
        };
        let survey = Survey {
            id: "state_of_js".into(),
            name: Some("State of JS".into()),
            editions: vec![edition.clone()],
            fields: survey_fields,
        };

        let merged = survey.edition_config(&edition);
        assert_eq!(merged["hashtag"], "stateofjs");
        assert_eq!(merged["color"], "blue");
        assert_eq!(merged["year"], 2023);
        assert_eq!(merged["editionId"], "js2023");
    }

    #[test]
    fn serializes_camel_case() {
        let question = Question {
            allow_multiple: Some(true),
            ..Question::new("q1", "multiple")
        };
        let json = serde_json::to_value(&question).unwrap();
        assert_eq!(json["allowMultiple"], true);
        assert!(json.get("allowOther").is_none());
    }
}

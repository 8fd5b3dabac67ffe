//! Closed catalog of template names

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Known question templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    /// Plain response field
    Default,
    /// Several predefined choices, "other" allowed
    Multiple,
    /// One predefined choice
    Single,
    /// One choice from a dropdown
    Dropdown,
    /// Numeric input
    Number,
    /// Numeric slider
    Slider,
    /// Free-text "other" answers
    Others,
    /// Free-text project names
    Project,
    /// Happiness scale
    Happiness,
    /// Agree/disagree scale
    Opinion,
    /// Feature experience
    Feature,
    /// Tool experience
    Tool,
    /// Computed: every feature
    AllFeatures,
    /// Computed: every tool
    AllTools,
    /// Computed: tools of a section
    SectionTools,
    /// Computed: tool ratios of a section
    SectionToolsRatios,
    /// Computed: completion statistics
    CompletionStats,
    /// Knowledge score
    KnowledgeScore,
    /// Referral source
    Source,
    /// Country of residence
    Country,
    /// Computed: data explorer
    DataExplorer,
}

impl TemplateKind {
    /// Every template, in catalog order
    pub const ALL: [Self; 21] = [
        Self::Default,
        Self::Multiple,
        Self::Single,
        Self::Dropdown,
        Self::Number,
        Self::Slider,
        Self::Others,
        Self::Project,
        Self::Happiness,
        Self::Opinion,
        Self::Feature,
        Self::Tool,
        Self::AllFeatures,
        Self::AllTools,
        Self::SectionTools,
        Self::SectionToolsRatios,
        Self::CompletionStats,
        Self::KnowledgeScore,
        Self::Source,
        Self::Country,
        Self::DataExplorer,
    ];

    /// Template name as written in outlines
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Multiple => "multiple",
            Self::Single => "single",
            Self::Dropdown => "dropdown",
            Self::Number => "number",
            Self::Slider => "slider",
            Self::Others => "others",
            Self::Project => "project",
            Self::Happiness => "happiness",
            Self::Opinion => "opinion",
            Self::Feature => "feature",
            Self::Tool => "tool",
            Self::AllFeatures => "all_features",
            Self::AllTools => "all_tools",
            Self::SectionTools => "section_tools",
            Self::SectionToolsRatios => "section_tools_ratios",
            Self::CompletionStats => "completion_stats",
            Self::KnowledgeScore => "knowledge_score",
            Self::Source => "source",
            Self::Country => "country",
            Self::DataExplorer => "data_explorer",
        }
    }

    /// Exact-name lookup
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// Templates computed by the API rather than stored per response
    #[inline]
    #[must_use]
    pub fn is_computed(self) -> bool {
        matches!(
            self,
            Self::AllFeatures
                | Self::AllTools
                | Self::SectionTools
                | Self::SectionToolsRatios
                | Self::CompletionStats
                | Self::DataExplorer
        )
    }
}

impl Display for TemplateKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip() {
        for kind in TemplateKind::ALL {
            assert_eq!(TemplateKind::from_name(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn lookup_is_exact() {
        assert_eq!(TemplateKind::from_name("Multiple"), None);
        assert_eq!(TemplateKind::from_name("multiple "), None);
        assert_eq!(TemplateKind::from_name("section_features"), None);
    }

    #[test]
    fn serde_uses_outline_names() {
        let json = serde_json::to_string(&TemplateKind::SectionToolsRatios).unwrap();
        assert_eq!(json, "\"section_tools_ratios\"");
    }
}

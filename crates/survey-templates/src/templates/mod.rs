//! Built-in template functions
//!
//! Every function here has the [`TemplateFn`](crate::TemplateFn) signature:
//! it validates the question id, applies its structural defaults, resolves
//! the paths it owns and merges them with the declaration.

mod choice;
mod experience;
mod freeform;
mod plain;

pub(crate) use choice::{country, dropdown, happiness, multiple, opinion, single};
pub(crate) use experience::{feature, tool};
pub use experience::{FEATURE_OPTIONS, TOOL_OPTIONS};
pub(crate) use freeform::{others, project, source};
pub(crate) use plain::{
    all_features, all_tools, completion_stats, data_explorer, default, knowledge_score, number,
    section_tools, section_tools_ratios, slider,
};

use crate::error::{TemplateError, TemplateResult};
use crate::kind::TemplateKind;
use crate::output::{NormPaths, QuestionTemplateOutput, RawPaths, TemplateContext};
use crate::resolver::{base_path, suffixed_path};
use survey_model::{graphqlize, DbSuffix, PathError, QuestionOption, Section};

/// Keys owned by the compiled descriptor; never copied from declarations
const OWNED_FIELDS: [&str; 6] = [
    "rawPaths",
    "normPaths",
    "optionTypeName",
    "enumTypeName",
    "surveyId",
    "sectionId",
];

/// Template-level defaults; explicit question fields win over these
#[derive(Debug, Default)]
pub(crate) struct Defaults {
    pub(crate) allow_multiple: Option<bool>,
    pub(crate) allow_other: Option<bool>,
    pub(crate) extends: Option<&'static str>,
    pub(crate) options: Option<Vec<QuestionOption>>,
    pub(crate) options_are_numeric: Option<bool>,
}

/// Question id, or `MissingId`
pub(crate) fn checked_id<'a>(ctx: &TemplateContext<'a>) -> TemplateResult<&'a str> {
    ctx.question
        .id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| TemplateError::MissingId {
            section: ctx.section.id.clone(),
            index: ctx.index,
        })
}

pub(crate) fn invalid_path(ctx: &TemplateContext<'_>, id: &str, source: PathError) -> TemplateError {
    TemplateError::path(ctx.section.id.clone(), id, source)
}

/// Validate the declaration and merge it over `defaults`, without paths
pub(crate) fn base_output(
    ctx: &TemplateContext<'_>,
    kind: TemplateKind,
    defaults: Defaults,
) -> TemplateResult<QuestionTemplateOutput> {
    let id = checked_id(ctx)?;
    let question = ctx.question;

    // Numeric defaults describe the default options only
    let default_numeric = defaults
        .options_are_numeric
        .filter(|_| question.options.is_none());
    let options = question.options.clone().or(defaults.options);
    let has_options = options.as_ref().is_some_and(|o| !o.is_empty());
    let options_are_numeric = question
        .options_are_numeric
        .or(default_numeric)
        .unwrap_or_else(|| {
            has_options
                && options
                    .iter()
                    .flatten()
                    .all(|option| option.id.is_numeric())
        });

    if has_options && !options_are_numeric {
        let invalid = options
            .iter()
            .flatten()
            .map(|option| option.id.to_string())
            .find(|value| !is_enum_value(value));
        if let Some(option) = invalid {
            return Err(TemplateError::InvalidOption {
                section: ctx.section.id.clone(),
                question: id.to_string(),
                option,
            });
        }
    }

    let (option_type_name, enum_type_name) = if has_options {
        let prefix = format!("{}{}", graphqlize(&ctx.survey.id), graphqlize(id));
        (Some(format!("{prefix}Option")), Some(format!("{prefix}ID")))
    } else {
        (None, None)
    };

    let mut fields = question.fields.clone();
    for key in OWNED_FIELDS {
        fields.remove(key);
    }

    Ok(QuestionTemplateOutput {
        id: id.to_string(),
        template: kind,
        survey_id: ctx.survey.id.clone(),
        section_id: ctx.section.id.clone(),
        raw_paths: None,
        norm_paths: None,
        option_type_name,
        enum_type_name,
        options,
        options_are_numeric,
        allow_multiple: question.allow_multiple.or(defaults.allow_multiple),
        allow_other: question.allow_other.or(defaults.allow_other),
        api_only: question.is_api_only(),
        extends: question
            .extends
            .clone()
            .or_else(|| defaults.extends.map(str::to_string)),
        fields,
    })
}

/// `[_A-Za-z][_0-9A-Za-z]*`, excluding `true`, `false` and `null`
fn is_enum_value(value: &str) -> bool {
    let mut chars = value.chars();
    let starts_well = chars
        .next()
        .is_some_and(|c| c == '_' || c.is_ascii_alphabetic());
    starts_well
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        && !matches!(value, "true" | "false" | "null")
}

/// `s__q` / `s.q`
pub(crate) fn bare_paths(section: &Section, id: &str) -> Result<(RawPaths, NormPaths), PathError> {
    let base = base_path(section, id)?;
    Ok(response_only(base.flat(), base.dotted()))
}

/// `s__q__suffix` / `s.q.suffix`
pub(crate) fn suffix_paths(
    section: &Section,
    id: &str,
    suffix: DbSuffix,
) -> Result<(RawPaths, NormPaths), PathError> {
    let path = suffixed_path(section, id, suffix)?;
    Ok(response_only(path.flat(), path.dotted()))
}

/// Add the free-text "other" field and its normalization quad
pub(crate) fn attach_others(
    raw: &mut RawPaths,
    norm: &mut NormPaths,
    section: &Section,
    id: &str,
) -> Result<(), PathError> {
    let others = suffixed_path(section, id, DbSuffix::Others)?;
    raw.other = Some(others.flat());
    norm.other = Some(others.child(DbSuffix::Normalized).dotted());
    norm.raw = Some(others.child(DbSuffix::Raw).dotted());
    norm.patterns = Some(others.child(DbSuffix::Patterns).dotted());
    norm.error = Some(others.child(DbSuffix::Error).dotted());
    Ok(())
}

fn response_only(flat: String, dotted: String) -> (RawPaths, NormPaths) {
    (
        RawPaths {
            response: flat,
            other: None,
            comment: None,
        },
        NormPaths {
            response: dotted,
            raw: None,
            patterns: None,
            error: None,
            other: None,
            comment: None,
        },
    )
}

/// Options `ids` with no labels
pub(crate) fn fixed_options<I, T>(ids: I) -> Vec<QuestionOption>
where
    I: IntoIterator<Item = T>,
    T: Into<survey_model::OptionId>,
{
    ids.into_iter().map(QuestionOption::new).collect()
}

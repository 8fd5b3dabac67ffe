//! Choice templates: answers picked from predefined options

use super::{attach_others, base_output, fixed_options, invalid_path, suffix_paths, Defaults};
use crate::error::TemplateResult;
use crate::kind::TemplateKind;
use crate::output::{QuestionTemplateOutput, TemplateContext};
use survey_model::DbSuffix;

/// Scale used by happiness and opinion questions
const SCALE: std::ops::RangeInclusive<i64> = 0..=4;

fn choice(
    ctx: &TemplateContext<'_>,
    kind: TemplateKind,
    defaults: Defaults,
) -> TemplateResult<QuestionTemplateOutput> {
    let mut output = base_output(ctx, kind, defaults)?;
    let id = output.id.as_str();

    let (mut raw, mut norm) = suffix_paths(ctx.section, id, DbSuffix::Choices)
        .map_err(|e| invalid_path(ctx, id, e))?;
    if output.allow_other == Some(true) {
        attach_others(&mut raw, &mut norm, ctx.section, id).map_err(|e| invalid_path(ctx, id, e))?;
    }

    output.raw_paths = Some(raw);
    output.norm_paths = Some(norm);
    Ok(output)
}

fn scale() -> Defaults {
    Defaults {
        options: Some(fixed_options(SCALE)),
        options_are_numeric: Some(true),
        ..Defaults::default()
    }
}

pub(crate) fn single(ctx: &TemplateContext<'_>) -> TemplateResult<QuestionTemplateOutput> {
    choice(ctx, TemplateKind::Single, Defaults::default())
}

pub(crate) fn dropdown(ctx: &TemplateContext<'_>) -> TemplateResult<QuestionTemplateOutput> {
    choice(ctx, TemplateKind::Dropdown, Defaults::default())
}

pub(crate) fn country(ctx: &TemplateContext<'_>) -> TemplateResult<QuestionTemplateOutput> {
    choice(ctx, TemplateKind::Country, Defaults::default())
}

/// Extends the shared `multiple` shape: several picks, "other" allowed
pub(crate) fn multiple(ctx: &TemplateContext<'_>) -> TemplateResult<QuestionTemplateOutput> {
    let defaults = Defaults {
        allow_multiple: Some(true),
        allow_other: Some(true),
        extends: Some("multiple"),
        ..Defaults::default()
    };
    choice(ctx, TemplateKind::Multiple, defaults)
}

pub(crate) fn happiness(ctx: &TemplateContext<'_>) -> TemplateResult<QuestionTemplateOutput> {
    choice(ctx, TemplateKind::Happiness, scale())
}

pub(crate) fn opinion(ctx: &TemplateContext<'_>) -> TemplateResult<QuestionTemplateOutput> {
    choice(ctx, TemplateKind::Opinion, scale())
}

//! Experience templates for features and tools

use super::{base_output, fixed_options, invalid_path, Defaults};
use crate::error::TemplateResult;
use crate::kind::TemplateKind;
use crate::output::{NormPaths, QuestionTemplateOutput, RawPaths, TemplateContext};
use crate::resolver::suffixed_path;
use survey_model::DbSuffix;

/// Experience levels offered for a feature
pub const FEATURE_OPTIONS: [&str; 3] = ["never_heard", "heard", "used"];

/// Experience levels offered for a tool
pub const TOOL_OPTIONS: [&str; 5] = [
    "never_heard",
    "interested",
    "not_interested",
    "would_use",
    "would_not_use",
];

fn experience(
    ctx: &TemplateContext<'_>,
    kind: TemplateKind,
    levels: &[&str],
) -> TemplateResult<QuestionTemplateOutput> {
    let defaults = Defaults {
        options: Some(fixed_options(levels.iter().copied())),
        options_are_numeric: Some(false),
        ..Defaults::default()
    };
    let mut output = base_output(ctx, kind, defaults)?;
    let id = output.id.as_str();

    let response = suffixed_path(ctx.section, id, DbSuffix::Experience)
        .map_err(|e| invalid_path(ctx, id, e))?;
    let comment = suffixed_path(ctx.section, id, DbSuffix::Comment)
        .map_err(|e| invalid_path(ctx, id, e))?;

    output.raw_paths = Some(RawPaths {
        response: response.flat(),
        other: None,
        comment: Some(comment.flat()),
    });
    output.norm_paths = Some(NormPaths {
        response: response.dotted(),
        raw: None,
        patterns: None,
        error: None,
        other: None,
        comment: Some(comment.dotted()),
    });
    Ok(output)
}

pub(crate) fn feature(ctx: &TemplateContext<'_>) -> TemplateResult<QuestionTemplateOutput> {
    experience(ctx, TemplateKind::Feature, &FEATURE_OPTIONS)
}

pub(crate) fn tool(ctx: &TemplateContext<'_>) -> TemplateResult<QuestionTemplateOutput> {
    experience(ctx, TemplateKind::Tool, &TOOL_OPTIONS)
}

//! Plain response templates and API-computed aggregates

use super::{bare_paths, base_output, invalid_path, Defaults};
use crate::error::TemplateResult;
use crate::kind::TemplateKind;
use crate::output::{QuestionTemplateOutput, TemplateContext};

fn plain(ctx: &TemplateContext<'_>, kind: TemplateKind) -> TemplateResult<QuestionTemplateOutput> {
    let mut output = base_output(ctx, kind, Defaults::default())?;
    let id = output.id.as_str();

    let (raw, norm) = bare_paths(ctx.section, id).map_err(|e| invalid_path(ctx, id, e))?;

    output.raw_paths = Some(raw);
    output.norm_paths = Some(norm);
    Ok(output)
}

// Computed by the API from other answers; nothing is stored per response.
fn computed(ctx: &TemplateContext<'_>, kind: TemplateKind) -> TemplateResult<QuestionTemplateOutput> {
    base_output(ctx, kind, Defaults::default())
}

pub(crate) fn default(ctx: &TemplateContext<'_>) -> TemplateResult<QuestionTemplateOutput> {
    plain(ctx, TemplateKind::Default)
}

pub(crate) fn number(ctx: &TemplateContext<'_>) -> TemplateResult<QuestionTemplateOutput> {
    plain(ctx, TemplateKind::Number)
}

pub(crate) fn slider(ctx: &TemplateContext<'_>) -> TemplateResult<QuestionTemplateOutput> {
    plain(ctx, TemplateKind::Slider)
}

pub(crate) fn knowledge_score(ctx: &TemplateContext<'_>) -> TemplateResult<QuestionTemplateOutput> {
    plain(ctx, TemplateKind::KnowledgeScore)
}

pub(crate) fn all_features(ctx: &TemplateContext<'_>) -> TemplateResult<QuestionTemplateOutput> {
    computed(ctx, TemplateKind::AllFeatures)
}

pub(crate) fn all_tools(ctx: &TemplateContext<'_>) -> TemplateResult<QuestionTemplateOutput> {
    computed(ctx, TemplateKind::AllTools)
}

pub(crate) fn section_tools(ctx: &TemplateContext<'_>) -> TemplateResult<QuestionTemplateOutput> {
    computed(ctx, TemplateKind::SectionTools)
}

pub(crate) fn section_tools_ratios(
    ctx: &TemplateContext<'_>,
) -> TemplateResult<QuestionTemplateOutput> {
    computed(ctx, TemplateKind::SectionToolsRatios)
}

pub(crate) fn completion_stats(ctx: &TemplateContext<'_>) -> TemplateResult<QuestionTemplateOutput> {
    computed(ctx, TemplateKind::CompletionStats)
}

pub(crate) fn data_explorer(ctx: &TemplateContext<'_>) -> TemplateResult<QuestionTemplateOutput> {
    computed(ctx, TemplateKind::DataExplorer)
}

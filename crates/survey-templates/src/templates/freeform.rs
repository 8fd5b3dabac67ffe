//! Free-text templates whose answers go through normalization

use super::{base_output, invalid_path, Defaults};
use crate::error::TemplateResult;
use crate::kind::TemplateKind;
use crate::output::{NormPaths, QuestionTemplateOutput, RawPaths, TemplateContext};
use crate::resolver::{base_path, suffixed_path};
use survey_model::{DbSuffix, StoragePath};

/// Raw field plus the raw/patterns/error/normalized quad under `base`
fn normalized(flat: String, base: &StoragePath) -> (RawPaths, NormPaths) {
    (
        RawPaths {
            response: flat,
            other: None,
            comment: None,
        },
        NormPaths {
            response: base.child(DbSuffix::Normalized).dotted(),
            raw: Some(base.child(DbSuffix::Raw).dotted()),
            patterns: Some(base.child(DbSuffix::Patterns).dotted()),
            error: Some(base.child(DbSuffix::Error).dotted()),
            other: None,
            comment: None,
        },
    )
}

fn others_like(
    ctx: &TemplateContext<'_>,
    kind: TemplateKind,
) -> TemplateResult<QuestionTemplateOutput> {
    let mut output = base_output(ctx, kind, Defaults::default())?;
    let id = output.id.as_str();

    let base = suffixed_path(ctx.section, id, DbSuffix::Others).map_err(|e| invalid_path(ctx, id, e))?;
    let (raw, norm) = normalized(base.flat(), &base);

    output.raw_paths = Some(raw);
    output.norm_paths = Some(norm);
    Ok(output)
}

/// `<section>.<question>.others.*`, tool sections under `tools_others`
pub(crate) fn others(ctx: &TemplateContext<'_>) -> TemplateResult<QuestionTemplateOutput> {
    others_like(ctx, TemplateKind::Others)
}

pub(crate) fn project(ctx: &TemplateContext<'_>) -> TemplateResult<QuestionTemplateOutput> {
    others_like(ctx, TemplateKind::Project)
}

/// Referral source: normalized directly under `<section>.<question>`
pub(crate) fn source(ctx: &TemplateContext<'_>) -> TemplateResult<QuestionTemplateOutput> {
    let mut output = base_output(ctx, TemplateKind::Source, Defaults::default())?;
    let id = output.id.as_str();

    let base = base_path(ctx.section, id).map_err(|e| invalid_path(ctx, id, e))?;
    let (raw, norm) = normalized(base.flat(), &base);

    output.raw_paths = Some(raw);
    output.norm_paths = Some(norm);
    Ok(output)
}

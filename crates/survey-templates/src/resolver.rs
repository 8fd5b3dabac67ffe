//! Path resolution for question storage fields
//!
//! Maps a (section, question, suffix) triple to the dotted path used inside
//! normalized response documents and the flat field name used at raw
//! ingestion.

use serde::Serialize;
use survey_model::{DbSuffix, PathError, Section, StoragePath};

/// Section template whose "others" answers live in a shared segment
pub const TOOL_SECTION_TEMPLATE: &str = "tool";

/// Segment used for "others" answers of tool sections
pub const TOOLS_OTHERS_SEGMENT: &str = "tools_others";

/// Id suffix carried by dedicated "others" questions
pub const OTHERS_QUESTION_SUFFIX: &str = "_others";

/// A path rendered both ways
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResolvedPath {
    /// `section.question.suffix`
    pub dotted: String,
    /// `section__question__suffix`
    pub flat: String,
}

impl From<&StoragePath> for ResolvedPath {
    fn from(path: &StoragePath) -> Self {
        Self {
            dotted: path.dotted(),
            flat: path.flat(),
        }
    }
}

/// Suffix-less `section.question` path
///
/// # Errors
/// Returns [`PathError`] when the section or question id is empty or
/// contains a separator.
pub fn base_path(section: &Section, question_id: &str) -> Result<StoragePath, PathError> {
    StoragePath::try_from_segments([section.segment(), question_id])
}

/// `section.question.suffix` path, with the "others" rules applied
///
/// For [`DbSuffix::Others`], tool sections use [`TOOLS_OTHERS_SEGMENT`] and
/// a trailing `_others` is stripped from the question id, since the suffix
/// adds it back.
///
/// # Errors
/// Returns [`PathError`] for empty or malformed ids.
pub fn suffixed_path(
    section: &Section,
    question_id: &str,
    suffix: DbSuffix,
) -> Result<StoragePath, PathError> {
    if suffix != DbSuffix::Others {
        return Ok(base_path(section, question_id)?.child(suffix));
    }

    let section_segment = if section.has_template(TOOL_SECTION_TEMPLATE) {
        TOOLS_OTHERS_SEGMENT
    } else {
        section.segment()
    };
    let question_segment = question_id
        .strip_suffix(OTHERS_QUESTION_SUFFIX)
        .unwrap_or(question_id);

    Ok(StoragePath::try_from_segments([section_segment, question_segment])?.child(suffix))
}

/// Resolve dotted and flat renderings for one suffix
///
/// # Errors
/// Returns [`PathError`] for empty or malformed ids.
pub fn resolve(
    section: &Section,
    question_id: &str,
    suffix: DbSuffix,
) -> Result<ResolvedPath, PathError> {
    suffixed_path(section, question_id, suffix).map(|path| ResolvedPath::from(&path))
}

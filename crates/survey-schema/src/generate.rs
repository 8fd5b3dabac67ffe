//! Type generators
//!
//! Each generator turns compiled questions or surveys into schema fragments.
//! Field indentation is four spaces; output is byte-stable for equal input.

use crate::fragment::{SchemaFragment, TypeKind};
use indexmap::IndexSet;
use survey_model::{graphqlize, Survey};
use survey_templates::QuestionTemplateOutput;

const INDENT: &str = "    ";

/// Name of the aggregate type listing every survey
pub const SURVEYS_TYPE_NAME: &str = "Surveys";

/// `<Survey>EditionID`
#[must_use]
pub fn edition_id_type_name(survey_id: &str) -> String {
    format!("{}EditionID", graphqlize(survey_id))
}

/// `<Survey>Survey`
#[must_use]
pub fn survey_type_name(survey_id: &str) -> String {
    format!("{}Survey", graphqlize(survey_id))
}

fn origin(question: &QuestionTemplateOutput) -> String {
    format!(
        "question '{}' (survey '{}', section '{}')",
        question.id, question.survey_id, question.section_id
    )
}

fn block(keyword: &str, name: &str, lines: impl IntoIterator<Item = String>) -> String {
    let mut def = format!("{keyword} {name} {{");
    for line in lines {
        def.push('\n');
        def.push_str(INDENT);
        def.push_str(&line);
    }
    def.push_str("\n}");
    def
}

/// Option object type for a question
///
/// Returns `None` when the question has no option type name or no options.
/// `average` is only exposed when at least one option carries one.
#[must_use]
pub fn generate_option_type(question: &QuestionTemplateOutput) -> Option<SchemaFragment> {
    let type_name = question.option_type_name.as_deref()?;
    let options = question.options.as_deref().filter(|o| !o.is_empty())?;

    let id_type = if question.options_are_numeric {
        "Float"
    } else {
        question.enum_type_name.as_deref()?
    };

    let mut lines = vec![
        format!("id: {id_type}"),
        "label: String".to_string(),
        "entity: Entity".to_string(),
        format!("editions: [{}]", edition_id_type_name(&question.survey_id)),
    ];
    if options.iter().any(|option| option.average.is_some()) {
        lines.push("average: Float".to_string());
    }

    Some(SchemaFragment::new(
        type_name,
        TypeKind::Option,
        block("type", type_name, lines),
        origin(question),
    ))
}

/// Enum of a question's textual option ids
///
/// Returns `None` for numeric options, which are typed `Float` instead.
#[must_use]
pub fn generate_enum_type(question: &QuestionTemplateOutput) -> Option<SchemaFragment> {
    if question.options_are_numeric {
        return None;
    }
    let type_name = question.enum_type_name.as_deref()?;
    let options = question.options.as_deref().filter(|o| !o.is_empty())?;

    let values: IndexSet<String> = options.iter().map(|option| option.id.to_string()).collect();

    Some(SchemaFragment::new(
        type_name,
        TypeKind::Enum,
        block("enum", type_name, values),
        origin(question),
    ))
}

/// Enum of a survey's edition ids
///
/// Returns `None` for a survey without editions.
#[must_use]
pub fn generate_edition_id_enum(survey: &Survey) -> Option<SchemaFragment> {
    if survey.editions.is_empty() {
        return None;
    }
    let type_name = edition_id_type_name(&survey.id);
    let values: IndexSet<String> = survey.editions.iter().map(|e| e.id.clone()).collect();

    Some(SchemaFragment::new(
        type_name.clone(),
        TypeKind::EditionId,
        block("enum", &type_name, values),
        format!("survey '{}'", survey.id),
    ))
}

/// Aggregate type with one field per survey, in input order
#[must_use]
pub fn generate_surveys_type(surveys: &[Survey]) -> SchemaFragment {
    let lines = surveys
        .iter()
        .map(|survey| format!("{}: {}", survey.id, survey_type_name(&survey.id)));

    SchemaFragment::new(
        SURVEYS_TYPE_NAME,
        TypeKind::Aggregate,
        block("type", SURVEYS_TYPE_NAME, lines),
        "surveys aggregate",
    )
}

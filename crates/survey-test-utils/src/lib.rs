//! Testing utilities for the survey workspace
//!
//! Entity builders and on-disk survey repositories.

#![allow(missing_docs)]

use std::fs;
use std::path::Path;
use survey_model::{Edition, Fields, Question, QuestionOption, Section, Survey};
use tempfile::TempDir;

pub fn question(id: &str, template: &str) -> Question {
    Question::new(id, template)
}

pub fn question_with_options(id: &str, template: &str, options: &[&str]) -> Question {
    Question::new(id, template).with_options(options.iter().copied().map(QuestionOption::new).collect())
}

pub fn section(id: &str, questions: Vec<Question>) -> Section {
    Section {
        id: id.to_string(),
        slug: None,
        template: None,
        questions,
        fields: Fields::new(),
    }
}

pub fn tool_section(id: &str, questions: Vec<Question>) -> Section {
    Section {
        template: Some("tool".to_string()),
        ..section(id, questions)
    }
}

pub fn edition(id: &str, sections: Vec<Section>) -> Edition {
    Edition {
        id: id.to_string(),
        year: None,
        sections,
        api_sections: vec![],
        fields: Fields::new(),
    }
}

pub fn survey(id: &str, editions: Vec<Edition>) -> Survey {
    Survey {
        id: id.to_string(),
        name: None,
        editions,
        fields: Fields::new(),
    }
}

/// One survey with `count` editions `<prefix>1..=count`, each a `usage` section
pub fn survey_with_editions(id: &str, prefix: &str, count: usize) -> Survey {
    let editions = (1..=count)
        .map(|n| {
            edition(
                &format!("{prefix}{n}"),
                vec![section(
                    "usage",
                    vec![
                        question_with_options("browsers", "multiple", &["chrome", "firefox"]),
                        question("age", "number"),
                    ],
                )],
            )
        })
        .collect();
    survey(id, editions)
}

pub fn survey_config_yaml(id: &str) -> String {
    format!("id: {id}\nname: {id} survey\nhashtag: {id}\n")
}

pub fn edition_config_yaml(id: &str, year: u32) -> String {
    format!("id: {id}\nyear: {year}\nstatus: 2\n")
}

pub fn questions_yaml() -> String {
    "- id: usage\n  questions:\n    - id: browsers\n      template: multiple\n      options:\n        - id: chrome\n        - id: firefox\n    - id: age\n      template: number\n".to_string()
}

pub fn api_yaml() -> String {
    "- id: computed\n  questions:\n    - id: completion\n      template: completion_stats\n".to_string()
}

/// Write `contents` at `root/relative`, creating parent directories
pub fn write_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// Write a full survey directory: config plus one directory per edition
pub fn write_survey(root: &Path, survey_id: &str, editions: &[&str]) {
    write_file(root, &format!("{survey_id}/config.yml"), &survey_config_yaml(survey_id));
    for (n, edition_id) in editions.iter().enumerate() {
        let year = 2016 + u32::try_from(n).unwrap();
        write_file(
            root,
            &format!("{survey_id}/{edition_id}/config.yml"),
            &edition_config_yaml(edition_id, year),
        );
        write_file(root, &format!("{survey_id}/{edition_id}/questions.yml"), &questions_yaml());
    }
}

/// Temporary survey repository holding `state_of_js` with `editions` editions
pub fn survey_repo(editions: usize) -> TempDir {
    let dir = TempDir::new().unwrap();
    let ids: Vec<String> = (1..=editions).map(|n| format!("js{n}")).collect();
    let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    write_survey(dir.path(), "state_of_js", &refs);
    dir
}

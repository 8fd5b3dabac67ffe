//! End-to-end reloads through the service

use pretty_assertions::assert_eq;
use std::sync::Arc;
use survey_cache::{KeyValueStore, MokaStore, StoreError};
use survey_core::{ServiceError, SurveyService};
use survey_loader::{ConfigError, Environment, LoadMode, SourceConfig};
use survey_test_utils::{survey_repo, write_file, write_survey};
use tempfile::TempDir;

fn local_config(root: &std::path::Path) -> SourceConfig {
    SourceConfig::new()
        .with_mode(LoadMode::Local)
        .with_surveys_dir(root)
        .with_environment(Environment::Production)
}

#[tokio::test]
async fn local_reload_populates_and_compiles() {
    let repo = survey_repo(3);
    let kv = Arc::new(MokaStore::default());
    let service = SurveyService::from_config(
        &local_config(repo.path()),
        Some(Arc::clone(&kv) as Arc<dyn KeyValueStore>),
    )
    .unwrap();

    let reload = service.reload().await.unwrap();

    assert!(reload.load_report.is_clean());
    assert!(reload.populate.unwrap().is_complete());
    assert_eq!(reload.generation.surveys.len(), 1);
    assert!(kv.get("surveys_js2").await.is_some());

    let sdl = service.sdl().unwrap();
    assert!(sdl.contains("enum StateOfJsEditionID {\n    js1\n    js2\n    js3\n}"));
    assert!(sdl.ends_with("}\n"));
}

#[tokio::test]
async fn schema_is_byte_stable_across_reloads() {
    let repo = survey_repo(2);
    let service = SurveyService::from_config(&local_config(repo.path()), None).unwrap();

    let first = service.reload().await.unwrap().generation.schema;
    let second = service.reload().await.unwrap().generation.schema;

    assert_eq!(first.document.to_sdl(), second.document.to_sdl());
    assert_eq!(first.document.content_hash(), second.document.content_hash());
    assert_eq!(service.current().unwrap().number, 2);
}

#[tokio::test]
async fn collision_rejects_reload_and_keeps_previous_generation() {
    let repo = TempDir::new().unwrap();
    write_survey(repo.path(), "state_of_js", &["js2023"]);
    let kv = Arc::new(MokaStore::default());
    let service = SurveyService::from_config(
        &local_config(repo.path()),
        Some(Arc::clone(&kv) as Arc<dyn KeyValueStore>),
    )
    .unwrap();
    service.reload().await.unwrap();
    let before = service.current().unwrap();

    write_survey(repo.path(), "state_of_css", &["css2023"]);
    write_file(
        repo.path(),
        "state_of_css/css2023/questions.yml",
        "- id: usage\n  questions:\n    - id: browsers\n      template: multiple\n    - id: browsers\n      template: single\n",
    );
    let err = service.reload().await.unwrap_err();

    assert!(matches!(err, ServiceError::Store(StoreError::Rejected { .. })));
    let after = service.current().unwrap();
    assert_eq!(after.number, before.number);
    assert!(Arc::ptr_eq(&after.schema, &before.schema));
    assert_eq!(service.store().get().len(), 1);
    assert!(kv.get("surveys_css2023").await.is_none());
}

#[tokio::test]
async fn remote_mode_without_repository_is_config_error() {
    let config = SourceConfig::new().with_mode(LoadMode::Remote);
    let err = SurveyService::from_config(&config, None).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Config(ConfigError::Missing { var: "SURVEYS_REPO" })
    ));
}

#[tokio::test]
async fn malformed_file_still_goes_live() {
    let repo = survey_repo(2);
    write_file(repo.path(), "state_of_js/js2/questions.yml", "- id: [\n");
    let service = SurveyService::from_config(&local_config(repo.path()), None).unwrap();

    let reload = service.reload().await.unwrap();

    assert_eq!(reload.load_report.len(), 1);
    assert_eq!(reload.generation.surveys[0].editions.len(), 2);
    assert!(service.schema().unwrap().document.len() > 1);
}

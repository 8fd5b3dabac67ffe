//! Survey loader
//!
//! Walks a [`SurveySource`]: one directory per survey holding `config.yml`,
//! one sub-directory per edition holding `config.yml`, `questions.yml` and
//! `api.yml`. Per-file failures are recorded in a [`LoadReport`]; only rate
//! limiting and an unreadable root abort the load.

use crate::config::{LoadMode, SourceConfig};
use crate::error::{FetchError, LoadError, LoadIssue, LoadResult};
use crate::source::{DirEntry, GithubConfig, GithubSource, LocalSource, SurveySource};
use crate::yaml::parse_yaml;
use futures::future::try_join_all;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use survey_model::{Edition, EditionConfig, Section, Survey, SurveyConfig};
use tracing::{debug, info, warn};

/// Survey-level and edition-level config file
pub const CONFIG_FILE: &str = "config.yml";
/// Edition outline file
pub const QUESTIONS_FILE: &str = "questions.yml";
/// Edition API-only outline file
pub const API_FILE: &str = "api.yml";

/// Recovered problems of one load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Issues in traversal order
    pub issues: Vec<LoadIssue>,
}

impl LoadReport {
    /// Whether the load recovered from nothing
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Number of issues
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Check if report is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Surveys of one load with their report
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    /// Surveys in listing order
    pub surveys: Vec<Survey>,
    /// Recovered problems
    pub report: LoadReport,
}

/// Loads every survey of a source
#[derive(Clone)]
pub struct SurveyLoader {
    source: Arc<dyn SurveySource>,
}

impl std::fmt::Debug for SurveyLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurveyLoader")
            .field("source", &self.source.name())
            .finish()
    }
}

impl SurveyLoader {
    /// Create loader over `source`
    pub fn new(source: impl SurveySource + 'static) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    /// Create loader over a shared source
    #[must_use]
    pub fn from_arc(source: Arc<dyn SurveySource>) -> Self {
        Self { source }
    }

    /// Create loader for the configured mode
    ///
    /// # Errors
    /// - `LoadError::Config` when remote mode has no repository
    /// - `LoadError::Source` when the HTTP client cannot be built
    pub fn from_config(config: &SourceConfig) -> LoadResult<Self> {
        config.validate()?;
        match config.mode {
            LoadMode::Local => Ok(Self::new(LocalSource::new(config.surveys_dir.clone()))),
            LoadMode::Remote => {
                let github = GithubConfig::from_source_config(config).ok_or(
                    crate::config::ConfigError::Missing { var: "SURVEYS_REPO" },
                )?;
                Ok(Self::new(GithubSource::new(github)?))
            }
        }
    }

    /// Source name
    #[inline]
    #[must_use]
    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Load every survey
    ///
    /// Surveys and editions are fetched concurrently; the result keeps
    /// listing order.
    ///
    /// # Errors
    /// - `LoadError::RateLimited` when any request is throttled
    /// - `LoadError::Source` when the root cannot be listed
    pub async fn load(&self) -> LoadResult<LoadOutcome> {
        info!(source = self.source.name(), "loading surveys");

        let root = self.source.list_dir("").await?;
        let survey_dirs = root.iter().filter(|e| e.is_dir() && !e.is_skipped());

        let loaded = try_join_all(survey_dirs.map(|dir| self.load_survey(dir))).await?;

        let mut outcome = LoadOutcome::default();
        for (survey, issues) in loaded {
            outcome.report.issues.extend(issues);
            outcome.surveys.extend(survey);
        }

        info!(
            source = self.source.name(),
            surveys = outcome.surveys.len(),
            issues = outcome.report.len(),
            "loaded surveys"
        );
        Ok(outcome)
    }

    async fn load_survey(&self, dir: &DirEntry) -> LoadResult<(Option<Survey>, Vec<LoadIssue>)> {
        debug!(survey = %dir.name, "loading survey");
        let mut issues = Vec::new();

        let Some(entries) = self.list(&dir.path, &mut issues).await? else {
            return Ok((None, issues));
        };

        let config = match entries.iter().find(|e| !e.is_dir() && e.name == CONFIG_FILE) {
            Some(entry) => self.read_yaml::<SurveyConfig>(entry, &mut issues).await?,
            None => None,
        };
        let Some(config) = config else {
            let issue = LoadIssue::MissingSurveyConfig {
                survey: dir.name.clone(),
            };
            warn!(survey = %dir.name, "{issue}");
            issues.push(issue);
            return Ok((None, issues));
        };

        let edition_dirs = entries.iter().filter(|e| e.is_dir() && !e.is_skipped());
        let editions = try_join_all(edition_dirs.map(|e| self.load_edition(e))).await?;

        let editions = editions
            .into_iter()
            .map(|(edition, edition_issues)| {
                issues.extend(edition_issues);
                edition
            })
            .collect();

        Ok((Some(Survey::from_config(&dir.name, config, editions)), issues))
    }

    async fn load_edition(&self, dir: &DirEntry) -> LoadResult<(Edition, Vec<LoadIssue>)> {
        debug!(edition = %dir.path, "loading edition");
        let mut issues = Vec::new();
        let entries = self.list(&dir.path, &mut issues).await?.unwrap_or_default();
        let file = |name: &str| entries.iter().find(|e| !e.is_dir() && e.name == name);

        let config: EditionConfig = match file(CONFIG_FILE) {
            Some(entry) => self.read_yaml(entry, &mut issues).await?,
            None => None,
        }
        .unwrap_or_default();

        let sections: Vec<Section> = match file(QUESTIONS_FILE) {
            Some(entry) => self.read_yaml(entry, &mut issues).await?,
            None => None,
        }
        .unwrap_or_default();

        let api_sections: Vec<Section> = match file(API_FILE) {
            Some(entry) => self.read_yaml(entry, &mut issues).await?,
            None => None,
        }
        .unwrap_or_default();

        let edition = Edition::from_config(&dir.name, config, sections, api_sections);
        debug!(
            edition = %edition.id,
            sections = edition.sections.len(),
            api_sections = edition.api_sections.len(),
            "loaded edition"
        );
        Ok((edition, issues))
    }

    /// List `path`, recording non-fatal failures
    async fn list(&self, path: &str, issues: &mut Vec<LoadIssue>) -> LoadResult<Option<Vec<DirEntry>>> {
        match self.source.list_dir(path).await {
            Ok(entries) => Ok(Some(entries)),
            Err(err) => recover(path, err, issues).map(|()| None),
        }
    }

    /// Read and decode one file, recording non-fatal failures
    async fn read_yaml<T: DeserializeOwned>(
        &self,
        entry: &DirEntry,
        issues: &mut Vec<LoadIssue>,
    ) -> LoadResult<Option<T>> {
        let text = match self.source.read_file(entry).await {
            Ok(text) => text,
            Err(err) => return recover(&entry.path, err, issues).map(|()| None),
        };

        match parse_yaml(&entry.path, &text) {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(path = %err.path, error = %err.message, "YAML parse error");
                issues.push(LoadIssue::Yaml(err));
                Ok(None)
            }
        }
    }
}

/// Record `err` as an issue unless it must abort the load
fn recover(path: &str, err: FetchError, issues: &mut Vec<LoadIssue>) -> LoadResult<()> {
    if let FetchError::RateLimited { reset_at } = err {
        return Err(LoadError::RateLimited { reset_at });
    }
    warn!(path, error = %err, "fetch failed");
    issues.push(LoadIssue::Fetch {
        path: path.to_string(),
        message: err.to_string(),
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use pretty_assertions::assert_eq;

    fn source() -> MemorySource {
        MemorySource::new()
            .with_file("state_of_js/config.yml", "id: state_of_js\nname: State of JS\n")
            .with_file("state_of_js/js2023/config.yml", "id: js2023\nyear: 2023\n")
            .with_file(
                "state_of_js/js2023/questions.yml",
                "- id: usage\n  questions:\n    - id: browsers\n      template: multiple\n",
            )
            .with_file(
                "state_of_js/js2023/api.yml",
                "- id: computed\n  questions:\n    - id: completion\n      template: completion_stats\n",
            )
            .with_file("state_of_js/_js2024/config.yml", "id: js2024\n")
            .with_file("_templates/config.yml", "id: templates\n")
    }

    #[tokio::test]
    async fn loads_and_merges_edition_files() {
        let outcome = SurveyLoader::new(source()).load().await.unwrap();
        assert!(outcome.report.is_clean());
        assert_eq!(outcome.surveys.len(), 1);

        let survey = &outcome.surveys[0];
        assert_eq!(survey.id, "state_of_js");
        assert_eq!(survey.name.as_deref(), Some("State of JS"));
        assert_eq!(survey.editions.len(), 1);

        let edition = &survey.editions[0];
        assert_eq!(edition.id, "js2023");
        assert_eq!(edition.year, Some(2023));
        assert_eq!(edition.sections[0].questions[0].api_only, None);
        assert_eq!(edition.api_sections[0].questions[0].api_only, Some(true));
    }

    #[tokio::test]
    async fn survey_without_config_is_skipped() {
        let source = source().with_file("state_of_css/css2023/config.yml", "id: css2023\n");
        let outcome = SurveyLoader::new(source).load().await.unwrap();

        let ids: Vec<_> = outcome.surveys.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["state_of_js"]);
        assert_eq!(
            outcome.report.issues,
            [LoadIssue::MissingSurveyConfig {
                survey: "state_of_css".into()
            }]
        );
    }

    #[tokio::test]
    async fn edition_without_config_uses_directory_name() {
        let source = MemorySource::new()
            .with_file("s/config.yml", "name: S\n")
            .with_file("s/e1/questions.yml", "- id: usage\n");
        let outcome = SurveyLoader::new(source).load().await.unwrap();

        let survey = &outcome.surveys[0];
        assert_eq!(survey.id, "s");
        assert_eq!(survey.editions[0].id, "e1");
        assert_eq!(survey.editions[0].sections.len(), 1);
        assert!(outcome.report.is_clean());
    }

    #[tokio::test]
    async fn malformed_file_contributes_nothing() {
        let source = source().with_file("state_of_js/js2023/api.yml", "- id: [\n");
        let outcome = SurveyLoader::new(source).load().await.unwrap();

        let edition = &outcome.surveys[0].editions[0];
        assert_eq!(edition.sections.len(), 1);
        assert!(edition.api_sections.is_empty());
        assert_eq!(outcome.report.len(), 1);
        assert_eq!(outcome.report.issues[0].path(), "state_of_js/js2023/api.yml");
    }

    #[tokio::test]
    async fn unparseable_survey_config_skips_survey() {
        let source = source().with_file("state_of_js/config.yml", "id: [\n");
        let outcome = SurveyLoader::new(source).load().await.unwrap();

        assert!(outcome.surveys.is_empty());
        assert_eq!(outcome.report.len(), 2);
        assert!(matches!(outcome.report.issues[0], LoadIssue::Yaml(_)));
        assert!(matches!(outcome.report.issues[1], LoadIssue::MissingSurveyConfig { .. }));
    }

    #[test]
    fn remote_config_without_repo_fails() {
        let err = SurveyLoader::from_config(&SourceConfig::new()).unwrap_err();
        assert!(matches!(err, LoadError::Config(_)));
    }

    #[test]
    fn local_config_builds_local_loader() {
        let config = SourceConfig::new()
            .with_mode(LoadMode::Local)
            .with_surveys_dir("/tmp/surveys");
        let loader = SurveyLoader::from_config(&config).unwrap();
        assert_eq!(loader.source_name(), "local");
    }
}

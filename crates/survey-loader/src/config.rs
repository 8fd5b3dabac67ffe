//! Runtime configuration for survey loading

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Owner used when `SURVEYS_REPO` names only the repository
pub const DEFAULT_OWNER: &str = "Devographics";

/// Default GitHub API root
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default local mirror, relative to the working directory
pub const DEFAULT_SURVEYS_DIR: &str = "../surveys";

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors in runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Required variable is not set
    #[error("environment variable {var} is not set")]
    Missing {
        /// Variable name
        var: &'static str,
    },

    /// Variable is set to an unusable value
    #[error("environment variable {var}={value:?} is invalid: {reason}")]
    Invalid {
        /// Variable name
        var: &'static str,
        /// Value as read
        value: String,
        /// Why it was rejected
        reason: String,
    },
}

/// Where definitions are read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadMode {
    /// GitHub contents API
    #[default]
    Remote,
    /// Local mirror directory
    Local,
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    Development,
    /// Test runs
    Test,
    /// Pre-production
    Staging,
    /// Production
    #[default]
    Production,
}

impl Environment {
    /// Parse an environment name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "test" => Some(Self::Test),
            "staging" => Some(Self::Staging),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    /// Whether the demo survey stays loaded
    #[inline]
    #[must_use]
    pub fn includes_demo(self) -> bool {
        matches!(self, Self::Development | Self::Test)
    }
}

/// Survey source configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Remote or local loading
    pub mode: LoadMode,
    /// Repository owner
    pub owner: String,
    /// Repository name; required in remote mode
    pub repo: Option<String>,
    /// GitHub token, sent as a bearer token
    #[serde(skip_serializing)]
    pub token: Option<String>,
    /// Local mirror root
    pub surveys_dir: PathBuf,
    /// Deployment environment
    pub environment: Environment,
    /// GitHub API root
    pub api_base_url: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            mode: LoadMode::Remote,
            owner: DEFAULT_OWNER.to_string(),
            repo: None,
            token: None,
            surveys_dir: PathBuf::from(DEFAULT_SURVEYS_DIR),
            environment: Environment::Production,
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl SourceConfig {
    /// Create configuration with defaults
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from process environment
    ///
    /// # Errors
    /// See [`from_lookup`](Self::from_lookup).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`
    ///
    /// Recognised variables: `SURVEYS_REPO` (`owner/repo` or `repo`),
    /// `LOAD_DATA` (`local` selects the local mirror), `GITHUB_TOKEN`,
    /// `SURVEYS_DIR`, `APP_ENV`, `SURVEYS_API_URL` and
    /// `SURVEYS_REQUEST_TIMEOUT_SECS`.
    ///
    /// # Errors
    /// - `ConfigError::Missing` when remote mode has no repository
    /// - `ConfigError::Invalid` for malformed values
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = get("LOAD_DATA") {
            config.mode = if value.trim() == "local" {
                LoadMode::Local
            } else {
                LoadMode::Remote
            };
        }

        if let Some(value) = get("SURVEYS_REPO") {
            let (owner, repo) = parse_repo(&value)?;
            if let Some(owner) = owner {
                config.owner = owner;
            }
            config.repo = Some(repo);
        }

        config.token = get("GITHUB_TOKEN");

        if let Some(dir) = get("SURVEYS_DIR") {
            config.surveys_dir = PathBuf::from(dir);
        }

        if let Some(value) = get("APP_ENV") {
            config.environment = Environment::from_name(&value).ok_or_else(|| ConfigError::Invalid {
                var: "APP_ENV",
                value: value.clone(),
                reason: "expected development, test, staging or production".to_string(),
            })?;
        }

        if let Some(url) = get("SURVEYS_API_URL") {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(value) = get("SURVEYS_REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "SURVEYS_REQUEST_TIMEOUT_SECS",
                        value,
                        reason: "expected a positive number of seconds".to_string(),
                    })
                }
            };
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the configuration is usable for its mode
    ///
    /// # Errors
    /// Returns `ConfigError::Missing` when remote mode has no repository.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mode == LoadMode::Remote && self.repo.is_none() {
            return Err(ConfigError::Missing { var: "SURVEYS_REPO" });
        }
        Ok(())
    }

    /// Per-request timeout
    #[inline]
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Set load mode
    #[must_use]
    pub fn with_mode(mut self, mode: LoadMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set repository owner and name
    #[must_use]
    pub fn with_repo(mut self, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        self.owner = owner.into();
        self.repo = Some(repo.into());
        self
    }

    /// Set GitHub token
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set local mirror root
    #[must_use]
    pub fn with_surveys_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.surveys_dir = dir.into();
        self
    }

    /// Set environment
    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Set GitHub API root
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set per-request timeout
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_secs = timeout.as_secs().max(1);
        self
    }
}

fn parse_repo(value: &str) -> Result<(Option<String>, String), ConfigError> {
    let invalid = || ConfigError::Invalid {
        var: "SURVEYS_REPO",
        value: value.to_string(),
        reason: "expected 'owner/repo' or 'repo'".to_string(),
    };

    let value = value.trim();
    match value.split_once('/') {
        None => Ok((None, value.to_string())),
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((Some(owner.to_string()), repo.to_string()))
        }
        Some(_) => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn remote_requires_repo() {
        let err = SourceConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing { var: "SURVEYS_REPO" });
    }

    #[test]
    fn repo_without_owner_uses_default_owner() {
        let config = SourceConfig::from_lookup(lookup(&[("SURVEYS_REPO", "surveys")])).unwrap();
        assert_eq!(config.owner, DEFAULT_OWNER);
        assert_eq!(config.repo.as_deref(), Some("surveys"));
        assert_eq!(config.mode, LoadMode::Remote);
    }

    #[test]
    fn owner_and_repo() {
        let config = SourceConfig::from_lookup(lookup(&[("SURVEYS_REPO", "acme/defs")])).unwrap();
        assert_eq!(config.owner, "acme");
        assert_eq!(config.repo.as_deref(), Some("defs"));
    }

    #[test]
    fn local_mode_needs_no_repo() {
        let config = SourceConfig::from_lookup(lookup(&[
            ("LOAD_DATA", "local"),
            ("SURVEYS_DIR", "/data/surveys"),
            ("APP_ENV", "development"),
        ]))
        .unwrap();
        assert_eq!(config.mode, LoadMode::Local);
        assert_eq!(config.surveys_dir, PathBuf::from("/data/surveys"));
        assert!(config.environment.includes_demo());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = SourceConfig::from_lookup(lookup(&[
            ("SURVEYS_REPO", "surveys"),
            ("SURVEYS_REQUEST_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "SURVEYS_REQUEST_TIMEOUT_SECS", .. }));

        let err = SourceConfig::from_lookup(lookup(&[("SURVEYS_REPO", "a/b/c")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "SURVEYS_REPO", .. }));

        let err = SourceConfig::from_lookup(lookup(&[("SURVEYS_REPO", "x"), ("APP_ENV", "qa")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "APP_ENV", .. }));
    }

    #[test]
    fn production_excludes_demo() {
        assert!(!Environment::Production.includes_demo());
        assert!(!Environment::Staging.includes_demo());
        assert!(Environment::Test.includes_demo());
    }

    #[test]
    fn builders() {
        let config = SourceConfig::new()
            .with_repo("acme", "defs")
            .with_token("t")
            .with_request_timeout(Duration::from_secs(5));
        assert!(config.validate().is_ok());
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.token.as_deref(), Some("t"));
    }
}

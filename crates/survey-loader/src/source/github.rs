//! GitHub contents API source

use super::{DirEntry, EntryKind, SurveySource};
use crate::config::{SourceConfig, DEFAULT_API_URL, DEFAULT_OWNER, DEFAULT_TIMEOUT_SECS};
use crate::error::FetchError;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::header::{HeaderMap, ACCEPT, LINK, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Page size requested from the contents API
pub const DEFAULT_PER_PAGE: u32 = 100;

const RATE_LIMIT_MESSAGE: &str = "API rate limit";
const REMAINING_HEADER: &str = "x-ratelimit-remaining";
const RESET_HEADER: &str = "x-ratelimit-reset";
const ACCEPT_JSON: &str = "application/vnd.github+json";
const ACCEPT_RAW: &str = "application/vnd.github.raw+json";
const AGENT: &str = concat!("survey-loader/", env!("CARGO_PKG_VERSION"));

/// GitHub repository coordinates and client settings
#[derive(Debug, Clone)]
pub struct GithubConfig {
    /// API root, e.g. `https://api.github.com`
    pub api_base_url: String,
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Bearer token
    pub token: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Listing page size
    pub per_page: u32,
}

impl GithubConfig {
    /// Create config for `owner/repo` with default settings
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            owner: owner.into(),
            repo: repo.into(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Config from runtime settings; `None` without a repository
    #[must_use]
    pub fn from_source_config(config: &SourceConfig) -> Option<Self> {
        let repo = config.repo.clone()?;
        Some(Self {
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            owner: config.owner.clone(),
            repo,
            token: config.token.clone(),
            timeout: config.request_timeout(),
            per_page: DEFAULT_PER_PAGE,
        })
    }

    /// Set API root
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set bearer token
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set listing page size
    #[must_use]
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.max(1);
        self
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self::new(DEFAULT_OWNER, "surveys")
    }
}

#[derive(Debug, Deserialize)]
struct ContentItem {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: String,
    download_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RateLimitBody {
    rate: RateLimitWindow,
}

#[derive(Debug, Deserialize)]
struct RateLimitWindow {
    reset: i64,
}

/// Source reading a repository through the GitHub contents API
#[derive(Debug, Clone)]
pub struct GithubSource {
    config: GithubConfig,
    client: Client,
}

impl GithubSource {
    /// Create source with its own HTTP client
    ///
    /// # Errors
    /// Returns `FetchError::Transport` if the HTTP client cannot be built.
    pub fn new(config: GithubConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::transport("", format!("failed to create HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    /// Repository coordinates
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GithubConfig {
        &self.config
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.config.api_base_url, self.config.owner, self.config.repo, path
        )
    }

    async fn get(&self, url: &str, path: &str, accept: &str) -> Result<Response, FetchError> {
        let mut request = self
            .client
            .get(url)
            .header(USER_AGENT, AGENT)
            .header(ACCEPT, accept);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::transport(path, e))?;
        self.check(response, path).await
    }

    /// Turn throttling and error statuses into errors
    async fn check(&self, response: Response, path: &str) -> Result<Response, FetchError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                path: path.to_string(),
            });
        }

        let headers = response.headers().clone();
        let body = response.text().await.unwrap_or_default();

        if is_rate_limited(status, &headers, &body) {
            let reset_at = self.rate_limit_reset(&headers).await;
            warn!(path, %reset_at, "GitHub rate limit hit");
            return Err(FetchError::RateLimited { reset_at });
        }

        Err(FetchError::transport(path, format!("HTTP {status}: {body}")))
    }

    /// Reset time from the limit-status endpoint, then the header, then now
    async fn rate_limit_reset(&self, headers: &HeaderMap) -> DateTime<Utc> {
        let url = format!("{}/rate_limit", self.config.api_base_url);
        let mut request = self.client.get(&url).header(USER_AGENT, AGENT);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let from_status = match request.send().await {
            Ok(response) if response.status().is_success() => response
                .json::<RateLimitBody>()
                .await
                .ok()
                .and_then(|body| epoch(body.rate.reset)),
            Ok(response) => {
                debug!(status = %response.status(), "rate limit status unavailable");
                None
            }
            Err(err) => {
                debug!(error = %err, "rate limit status unavailable");
                None
            }
        };

        from_status
            .or_else(|| {
                headers
                    .get(RESET_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse::<i64>().ok())
                    .and_then(epoch)
            })
            .unwrap_or_else(Utc::now)
    }
}

/// Target of the `rel="next"` entry of a `Link` header
fn next_link(headers: &HeaderMap) -> Option<String> {
    let link = headers.get(LINK)?.to_str().ok()?;
    link.split(',').find_map(|part| {
        let (target, params) = part.split_once(';')?;
        let is_next = params
            .split(';')
            .any(|param| matches!(param.trim(), "rel=\"next\"" | "rel=next"));
        let target = target.trim().strip_prefix('<')?.strip_suffix('>')?;
        is_next.then(|| target.to_string())
    })
}

fn epoch(secs: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0).single()
}

fn is_rate_limited(status: StatusCode, headers: &HeaderMap, body: &str) -> bool {
    if status != StatusCode::FORBIDDEN && status != StatusCode::TOO_MANY_REQUESTS {
        return false;
    }
    let exhausted = headers
        .get(REMAINING_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim() == "0");
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .is_some_and(|m| m.contains(RATE_LIMIT_MESSAGE));
    exhausted || message || status == StatusCode::TOO_MANY_REQUESTS
}

#[async_trait]
impl SurveySource for GithubSource {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>, FetchError> {
        let per_page = self.config.per_page;
        let mut next = Some(format!("{}?per_page={per_page}", self.contents_url(path)));
        let mut previous_first: Option<String> = None;
        let mut entries = Vec::new();

        while let Some(url) = next.take() {
            debug!(path, %url, "listing GitHub directory");
            let response = self.get(&url, path, ACCEPT_JSON).await?;
            next = next_link(response.headers());
            let items: Vec<ContentItem> = response
                .json()
                .await
                .map_err(|e| FetchError::transport(path, format!("invalid listing: {e}")))?;

            let first = items.first().map(|item| item.path.clone());
            if first.is_some() && first == previous_first {
                warn!(path, "listing page repeated, stopping pagination");
                break;
            }
            previous_first = first;

            entries.extend(items.into_iter().map(|item| DirEntry {
                kind: if item.kind == "dir" {
                    EntryKind::Dir
                } else {
                    EntryKind::File
                },
                name: item.name,
                path: item.path,
                download_url: item.download_url,
            }));
        }

        Ok(entries)
    }

    async fn read_file(&self, entry: &DirEntry) -> Result<String, FetchError> {
        let response = match &entry.download_url {
            Some(url) => self.get(url, &entry.path, ACCEPT_JSON).await?,
            None => {
                self.get(&self.contents_url(&entry.path), &entry.path, ACCEPT_RAW)
                    .await?
            }
        };
        response
            .text()
            .await
            .map_err(|e| FetchError::transport(&entry.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn detects_rate_limit_message() {
        let body = r#"{"message":"API rate limit exceeded for 1.2.3.4."}"#;
        assert!(is_rate_limited(StatusCode::FORBIDDEN, &HeaderMap::new(), body));
        assert!(!is_rate_limited(StatusCode::FORBIDDEN, &HeaderMap::new(), r#"{"message":"Forbidden"}"#));
        assert!(!is_rate_limited(StatusCode::OK, &HeaderMap::new(), body));
    }

    #[test]
    fn detects_exhausted_header() {
        let mut headers = HeaderMap::new();
        headers.insert(REMAINING_HEADER, HeaderValue::from_static("0"));
        assert!(is_rate_limited(StatusCode::FORBIDDEN, &headers, ""));
    }

    #[test]
    fn parses_next_link() {
        let mut headers = HeaderMap::new();
        headers.insert(
            LINK,
            HeaderValue::from_static(
                r#"<https://api.github.com/x?page=2>; rel="next", <https://api.github.com/x?page=5>; rel="last""#,
            ),
        );
        assert_eq!(next_link(&headers).as_deref(), Some("https://api.github.com/x?page=2"));

        headers.insert(LINK, HeaderValue::from_static(r#"<https://api.github.com/x?page=1>; rel="prev""#));
        assert!(next_link(&headers).is_none());
        assert!(next_link(&HeaderMap::new()).is_none());
    }

    #[test]
    fn config_from_source_config() {
        let source = SourceConfig::new().with_repo("acme", "defs").with_token("t");
        let config = GithubConfig::from_source_config(&source).unwrap();
        assert_eq!(config.owner, "acme");
        assert_eq!(config.repo, "defs");
        assert_eq!(config.token.as_deref(), Some("t"));
        assert!(GithubConfig::from_source_config(&SourceConfig::new()).is_none());
    }
}

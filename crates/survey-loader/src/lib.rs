//! Survey Loader
//!
//! Reads survey definitions from the GitHub repository that is their source
//! of truth, or from a local mirror of it.
//!
//! # Core Concepts
//!
//! - [`SurveySource`]: list/read access, implemented by [`GithubSource`],
//!   [`LocalSource`] and [`MemorySource`]
//! - [`SurveyLoader`]: traversal shared by every source, with per-file
//!   recovery collected into a [`LoadReport`]
//! - [`SourceConfig`]: environment-driven runtime settings
//!
//! # Example
//!
//! ```rust
//! use survey_loader::{MemorySource, SurveyLoader};
//!
//! # tokio_test_block_on(async {
//! let source = MemorySource::new()
//!     .with_file("state_of_js/config.yml", "id: state_of_js\n")
//!     .with_file("state_of_js/js2023/config.yml", "id: js2023\n");
//!
//! let outcome = SurveyLoader::new(source).load().await.unwrap();
//! assert_eq!(outcome.surveys[0].editions[0].id, "js2023");
//! assert!(outcome.report.is_clean());
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod config;
mod error;
mod loader;
mod source;
mod yaml;

pub use config::{
    ConfigError, Environment, LoadMode, SourceConfig, DEFAULT_API_URL, DEFAULT_OWNER,
    DEFAULT_SURVEYS_DIR, DEFAULT_TIMEOUT_SECS,
};
pub use error::{FetchError, LoadError, LoadIssue, LoadResult, YamlParseError};
pub use loader::{LoadOutcome, LoadReport, SurveyLoader, API_FILE, CONFIG_FILE, QUESTIONS_FILE};
pub use source::{
    DirEntry, EntryKind, GithubConfig, GithubSource, LocalSource, MemorySource, SurveySource,
    DEFAULT_PER_PAGE, EXCLUDED_NAMES,
};
pub use yaml::parse_yaml;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

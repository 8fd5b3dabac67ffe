//! Survey Core
//!
//! Service facade over the survey pipeline: definitions are loaded, cached
//! and compiled into a schema, and the result goes live in one step.
//!
//! # Core Concepts
//!
//! - [`SurveyService`]: single-flight reload publishing surveys and schema
//!   together as a [`Generation`]
//! - [`telemetry::init`]: tracing subscriber driven by `RUST_LOG`
//!
//! # Example
//!
//! ```rust
//! use survey_cache::SurveyStore;
//! use survey_core::SurveyService;
//! use survey_loader::{Environment, MemorySource, SurveyLoader};
//!
//! # tokio_test_block_on(async {
//! let source = MemorySource::new()
//!     .with_file("state_of_js/config.yml", "id: state_of_js\n")
//!     .with_file("state_of_js/js2023/config.yml", "id: js2023\n");
//! let store = SurveyStore::new(SurveyLoader::new(source), Environment::Production);
//! let service = SurveyService::new(store);
//!
//! service.reload().await.unwrap();
//! assert!(service.sdl().unwrap().contains("type Surveys"));
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod service;
pub mod telemetry;

pub use error::{ServiceError, ServiceResult};
pub use service::{Generation, ServiceReload, SurveyService};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

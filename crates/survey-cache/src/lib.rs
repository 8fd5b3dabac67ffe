//! Survey Cache
//!
//! Holds the live survey set for the process and mirrors it into an
//! external key-value store on every reload.
//!
//! # Core Concepts
//!
//! - [`SurveyStore`]: atomic snapshot with single-flight reload
//! - [`populate`]: derives the `surveys_*` key families
//! - [`KeyValueStore`]: external cache boundary, with [`MokaStore`] in process
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use survey_cache::{KeyValueStore, MokaStore, SurveyStore};
//! use survey_loader::{Environment, MemorySource, SurveyLoader};
//!
//! # tokio_test_block_on(async {
//! let source = MemorySource::new()
//!     .with_file("state_of_js/config.yml", "id: state_of_js\n")
//!     .with_file("state_of_js/js2023/config.yml", "id: js2023\n");
//! let kv = Arc::new(MokaStore::default());
//! let store = SurveyStore::new(SurveyLoader::new(source), Environment::Production)
//!     .with_kv_store(kv.clone());
//!
//! store.reload().await.unwrap();
//! assert_eq!(store.get().len(), 1);
//! assert!(kv.get("surveys_js2023").await.is_some());
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod keys;
mod kv;
mod populate;
mod store;

pub use error::{CacheWriteError, StoreError, StoreResult};
pub use keys::{edition_key, ALL_SURVEYS_KEY, ALL_SURVEYS_METADATA_KEY, EDITION_KEY_PREFIX};
pub use kv::{KeyValueStore, MokaStore, StoreStats};
pub use populate::{edition_entry, populate, surveys_metadata, PopulateReport};
pub use store::{ReloadOutcome, SurveyStore, DEMO_SURVEY_ID};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Process-wide survey snapshot
//!
//! Readers call [`SurveyStore::get`] and receive an `Arc` of a complete
//! survey set. [`SurveyStore::reload`] builds the next set off to the side,
//! populates the key-value store, then replaces the snapshot in one step.
//! Reloads are single-flight: a second caller waits for the first.

use crate::error::{StoreError, StoreResult};
use crate::kv::KeyValueStore;
use crate::populate::{populate, PopulateReport};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use survey_loader::{Environment, LoadReport, SourceConfig, SurveyLoader};
use survey_model::{Edition, Survey};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Sentinel survey kept only in development and test environments
pub const DEMO_SURVEY_ID: &str = "demo_survey";

#[derive(Clone)]
struct Snapshot {
    surveys: Arc<[Survey]>,
    generation: u64,
}

/// Result of a successful reload
#[derive(Debug, Clone)]
pub struct ReloadOutcome<T = ()> {
    /// Survey set now live
    pub surveys: Arc<[Survey]>,
    /// Per-file issues recovered during loading
    pub report: LoadReport,
    /// Key-value population result, when a store is attached
    pub populate: Option<PopulateReport>,
    /// Snapshot generation, incremented by each successful reload
    pub generation: u64,
    /// Value produced by the prepare step
    pub prepared: T,
}

/// Refreshable survey set shared by the whole process
pub struct SurveyStore {
    loader: SurveyLoader,
    environment: Environment,
    kv: Option<Arc<dyn KeyValueStore>>,
    snapshot: RwLock<Snapshot>,
    reload_lock: Mutex<()>,
}

impl fmt::Debug for SurveyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot.read();
        f.debug_struct("SurveyStore")
            .field("loader", &self.loader)
            .field("environment", &self.environment)
            .field("kv", &self.kv.is_some())
            .field("surveys", &snapshot.surveys.len())
            .field("generation", &snapshot.generation)
            .finish_non_exhaustive()
    }
}

impl SurveyStore {
    /// Create an empty store over `loader`
    #[must_use]
    pub fn new(loader: SurveyLoader, environment: Environment) -> Self {
        Self {
            loader,
            environment,
            kv: None,
            snapshot: RwLock::new(Snapshot {
                surveys: Arc::from(Vec::new()),
                generation: 0,
            }),
            reload_lock: Mutex::new(()),
        }
    }

    /// Create store from runtime configuration
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Load`] if the source cannot be constructed.
    pub fn from_config(config: &SourceConfig) -> StoreResult<Self> {
        let loader = SurveyLoader::from_config(config)?;
        Ok(Self::new(loader, config.environment))
    }

    /// Attach a key-value store populated on every reload
    #[must_use]
    pub fn with_kv_store(mut self, kv: Arc<dyn KeyValueStore>) -> Self {
        self.kv = Some(kv);
        self
    }

    /// Environment deciding demo inclusion
    #[inline]
    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Current survey set; never triggers a load
    #[inline]
    #[must_use]
    pub fn get(&self) -> Arc<[Survey]> {
        Arc::clone(&self.snapshot.read().surveys)
    }

    /// Number of successful reloads so far
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.snapshot.read().generation
    }

    /// Look up a survey in the current set
    #[must_use]
    pub fn survey(&self, survey_id: &str) -> Option<Survey> {
        self.get().iter().find(|s| s.id == survey_id).cloned()
    }

    /// Look up an edition and its survey id in the current set
    #[must_use]
    pub fn edition(&self, edition_id: &str) -> Option<(String, Edition)> {
        self.get().iter().find_map(|survey| {
            survey
                .edition(edition_id)
                .map(|edition| (survey.id.clone(), edition.clone()))
        })
    }

    /// Reload the survey set
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Load`] if loading fails as a whole; the
    /// previous snapshot stays live.
    pub async fn reload(&self) -> StoreResult<ReloadOutcome> {
        self.reload_with(|_| Ok::<_, std::convert::Infallible>(()))
            .await
    }

    /// Reload, running `prepare` over the new set before it goes live
    ///
    /// A `prepare` error rejects the reload before anything is written.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Load`] on load failure or
    /// [`StoreError::Rejected`] if `prepare` fails.
    pub async fn reload_with<T, E, F>(&self, prepare: F) -> StoreResult<ReloadOutcome<T>>
    where
        F: FnOnce(&[Survey]) -> Result<T, E>,
        E: fmt::Display,
    {
        let _guard = self.reload_lock.lock().await;
        debug!(source = self.loader.source_name(), "reloading surveys");

        let outcome = self.loader.load().await?;
        let mut surveys = outcome.surveys;
        if !self.environment.includes_demo() {
            surveys.retain(|survey| survey.id != DEMO_SURVEY_ID);
        }

        let prepared = prepare(&surveys).map_err(StoreError::rejected)?;

        let populated = match &self.kv {
            Some(kv) => Some(populate(kv.as_ref(), &surveys).await),
            None => None,
        };

        let surveys: Arc<[Survey]> = Arc::from(surveys);
        let generation = {
            let mut snapshot = self.snapshot.write();
            let generation = snapshot.generation + 1;
            *snapshot = Snapshot {
                surveys: Arc::clone(&surveys),
                generation,
            };
            generation
        };

        info!(
            surveys = surveys.len(),
            issues = outcome.report.len(),
            generation,
            "surveys reloaded"
        );

        Ok(ReloadOutcome {
            surveys,
            report: outcome.report,
            populate: populated,
            generation,
            prepared,
        })
    }
}

//! Survey service
//!
//! Wires the loader, the survey store and the schema compiler behind a
//! single reload. A reload whose schema fails to assemble never goes live:
//! both the surveys and the schema stay at the previous generation.

use crate::error::ServiceResult;
use parking_lot::RwLock;
use std::sync::Arc;
use survey_cache::{KeyValueStore, PopulateReport, SurveyStore};
use survey_loader::{LoadReport, SourceConfig};
use survey_model::Survey;
use survey_schema::{compile_schema, CompiledSchema};
use survey_templates::TemplateRegistry;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Surveys and schema of one generation
#[derive(Debug, Clone)]
pub struct Generation {
    /// Live surveys
    pub surveys: Arc<[Survey]>,
    /// Schema compiled from `surveys`
    pub schema: Arc<CompiledSchema>,
    /// Reload counter
    pub number: u64,
}

/// Result of [`SurveyService::reload`]
#[derive(Debug, Clone)]
pub struct ServiceReload {
    /// Generation now live
    pub generation: Generation,
    /// Per-file issues recovered during loading
    pub load_report: LoadReport,
    /// Key-value population result, when a store is attached
    pub populate: Option<PopulateReport>,
}

/// Load → cache → schema pipeline
#[derive(Debug)]
pub struct SurveyService {
    store: SurveyStore,
    registry: Arc<TemplateRegistry>,
    current: RwLock<Option<Generation>>,
    reload_lock: Mutex<()>,
}

impl SurveyService {
    /// Create service over `store` using the built-in templates
    #[must_use]
    pub fn new(store: SurveyStore) -> Self {
        Self::with_registry(store, Arc::new(TemplateRegistry::builtin().clone()))
    }

    /// Create service with a custom template registry
    #[must_use]
    pub fn with_registry(store: SurveyStore, registry: Arc<TemplateRegistry>) -> Self {
        Self {
            store,
            registry,
            current: RwLock::new(None),
            reload_lock: Mutex::new(()),
        }
    }

    /// Create service from runtime configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the source settings are invalid.
    pub fn from_config(
        config: &SourceConfig,
        kv: Option<Arc<dyn KeyValueStore>>,
    ) -> ServiceResult<Self> {
        config.validate()?;
        let mut store = SurveyStore::from_config(config)?;
        if let Some(kv) = kv {
            store = store.with_kv_store(kv);
        }
        Ok(Self::new(store))
    }

    /// Create service from process environment variables
    ///
    /// # Errors
    ///
    /// Returns a configuration error for missing or invalid variables.
    pub fn from_env(kv: Option<Arc<dyn KeyValueStore>>) -> ServiceResult<Self> {
        let config = SourceConfig::from_env()?;
        Self::from_config(&config, kv)
    }

    /// Underlying survey store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &SurveyStore {
        &self.store
    }

    /// Template registry used for compilation
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// Current generation, `None` before the first successful reload
    #[must_use]
    pub fn current(&self) -> Option<Generation> {
        self.current.read().clone()
    }

    /// Current surveys
    #[must_use]
    pub fn surveys(&self) -> Arc<[Survey]> {
        self.current
            .read()
            .as_ref()
            .map_or_else(|| Arc::from(Vec::new()), |g| Arc::clone(&g.surveys))
    }

    /// Current schema
    #[must_use]
    pub fn schema(&self) -> Option<Arc<CompiledSchema>> {
        self.current.read().as_ref().map(|g| Arc::clone(&g.schema))
    }

    /// Current schema as SDL text
    #[must_use]
    pub fn sdl(&self) -> Option<String> {
        self.schema().map(|schema| schema.document.to_sdl())
    }

    /// Reload surveys and recompile the schema
    ///
    /// # Errors
    ///
    /// - Load failures, including rate limiting
    /// - Schema collisions, which reject the reload before anything is written
    pub async fn reload(&self) -> ServiceResult<ServiceReload> {
        let _guard = self.reload_lock.lock().await;
        let registry = Arc::clone(&self.registry);

        let outcome = self
            .store
            .reload_with(|surveys| compile_schema(surveys, &registry).map(Arc::new))
            .await
            .map_err(|err| {
                warn!(error = %err, "survey reload failed");
                err
            })?;

        let generation = Generation {
            surveys: outcome.surveys,
            schema: outcome.prepared,
            number: outcome.generation,
        };
        *self.current.write() = Some(generation.clone());

        info!(
            generation = generation.number,
            types = generation.schema.document.len(),
            schema_issues = generation.schema.issues.len(),
            "schema live"
        );

        Ok(ServiceReload {
            generation,
            load_report: outcome.report,
            populate: outcome.populate,
        })
    }
}

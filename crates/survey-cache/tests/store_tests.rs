//! Reload semantics of the survey store

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use survey_cache::{
    CacheWriteError, KeyValueStore, StoreError, SurveyStore, ALL_SURVEYS_KEY,
    ALL_SURVEYS_METADATA_KEY,
};
use survey_loader::{DirEntry, Environment, FetchError, MemorySource, SurveyLoader, SurveySource};
use survey_model::Survey;

fn repo(surveys: &[&str], editions: usize) -> MemorySource {
    let mut source = MemorySource::new();
    for id in surveys {
        source.insert(format!("{id}/config.yml"), format!("id: {id}\n"));
        for n in 1..=editions {
            let edition = format!("{id}{n}");
            source.insert(format!("{id}/{edition}/config.yml"), format!("id: {edition}\n"));
            source.insert(
                format!("{id}/{edition}/questions.yml"),
                survey_test_utils::questions_yaml(),
            );
        }
    }
    source
}

/// Serves `first` until switched, then `second` (or a failure when absent)
struct SwitchingSource {
    first: MemorySource,
    second: Option<MemorySource>,
    switched: AtomicBool,
}

impl SwitchingSource {
    fn new(first: MemorySource, second: Option<MemorySource>) -> Arc<Self> {
        Arc::new(Self {
            first,
            second,
            switched: AtomicBool::new(false),
        })
    }

    fn switch(&self) {
        self.switched.store(true, Ordering::SeqCst);
    }

    fn current(&self) -> Result<&MemorySource, FetchError> {
        if !self.switched.load(Ordering::SeqCst) {
            return Ok(&self.first);
        }
        self.second.as_ref().ok_or_else(|| FetchError::RateLimited {
            reset_at: Utc::now(),
        })
    }
}

#[async_trait]
impl SurveySource for SwitchingSource {
    fn name(&self) -> &'static str {
        "switching"
    }

    async fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>, FetchError> {
        self.current()?.list_dir(path).await
    }

    async fn read_file(&self, entry: &DirEntry) -> Result<String, FetchError> {
        self.current()?.read_file(entry).await
    }
}

/// Key-value store that sleeps on every write and tracks overlapping writers
#[derive(Default)]
struct SlowStore {
    delay: Duration,
    entries: Mutex<HashMap<String, String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    fail_key: Option<String>,
}

impl SlowStore {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    fn failing_on(key: &str) -> Self {
        Self {
            fail_key: Some(key.to_string()),
            ..Self::default()
        }
    }
}

#[async_trait]
impl KeyValueStore for SlowStore {
    async fn set(&self, key: &str, value: String) -> Result<(), CacheWriteError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_key.as_deref() == Some(key) {
            return Err(CacheWriteError::new(key, "connection reset"));
        }
        self.entries.lock().insert(key.to_string(), value);
        Ok(())
    }

    async fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }
}

fn ids(surveys: &[Survey]) -> Vec<String> {
    surveys.iter().map(|s| s.id.clone()).collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn readers_see_old_or_new_set_during_slow_reload() {
    let source = SwitchingSource::new(
        repo(&["state_of_css", "state_of_js"], 3),
        Some(repo(&["state_of_html", "state_of_react", "state_of_ai"], 2)),
    );
    let kv = Arc::new(SlowStore::new(Duration::from_millis(10)));
    let store = Arc::new(
        SurveyStore::new(
            SurveyLoader::from_arc(source.clone()),
            Environment::Production,
        )
        .with_kv_store(kv),
    );

    let old = ids(&store.reload().await.unwrap().surveys);
    source.switch();

    let reload = tokio::spawn({
        let store = Arc::clone(&store);
        async move { store.reload().await.map(|outcome| ids(&outcome.surveys)) }
    });

    let mut observed = Vec::new();
    while !reload.is_finished() {
        let current = store.get();
        observed.push(ids(&current));
        assert!(current.iter().all(|s| s.editions.iter().all(|e| !e.sections.is_empty())));
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    let new = reload.await.unwrap().unwrap();

    assert_eq!(new, ["state_of_ai", "state_of_html", "state_of_react"]);
    assert!(observed.iter().all(|seen| *seen == old || *seen == new));
    assert!(observed.iter().any(|seen| *seen == old));
    assert_eq!(ids(&store.get()), new);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_reloads_are_serialized() {
    let kv = Arc::new(SlowStore::new(Duration::from_millis(2)));
    let store = Arc::new(
        SurveyStore::new(SurveyLoader::new(repo(&["state_of_js"], 4)), Environment::Test)
            .with_kv_store(Arc::clone(&kv) as Arc<dyn KeyValueStore>),
    );

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.reload().await.map(|o| o.generation) })
        })
        .collect();

    let mut generations = Vec::new();
    for handle in handles {
        generations.push(handle.await.unwrap().unwrap());
    }
    generations.sort_unstable();

    assert_eq!(generations, [1, 2, 3, 4]);
    assert_eq!(kv.max_in_flight.load(Ordering::SeqCst), 1);
    assert_eq!(store.generation(), 4);
}

#[tokio::test]
async fn failed_edition_write_does_not_block_others() {
    let kv = Arc::new(SlowStore::failing_on("surveys_state_of_js2"));
    let store = SurveyStore::new(SurveyLoader::new(repo(&["state_of_js"], 3)), Environment::Test)
        .with_kv_store(Arc::clone(&kv) as Arc<dyn KeyValueStore>);

    let outcome = store.reload().await.unwrap();
    let report = outcome.populate.unwrap();

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].key, "surveys_state_of_js2");
    assert_eq!(
        report.written,
        [
            ALL_SURVEYS_KEY,
            ALL_SURVEYS_METADATA_KEY,
            "surveys_state_of_js1",
            "surveys_state_of_js3"
        ]
    );
    assert!(kv.get("surveys_state_of_js3").await.is_some());
    assert_eq!(store.get().len(), 1);
}

#[tokio::test]
async fn rate_limited_reload_keeps_previous_snapshot() {
    let source = SwitchingSource::new(repo(&["state_of_js"], 1), None);
    let store = SurveyStore::new(SurveyLoader::from_arc(source.clone()), Environment::Production);
    store.reload().await.unwrap();
    let before = store.get();

    source.switch();
    let err = store.reload().await.unwrap_err();

    assert!(matches!(err, StoreError::Load(_)));
    assert!(err.is_rate_limited());
    assert!(Arc::ptr_eq(&before, &store.get()));
}

#[tokio::test]
async fn cached_entries_decode_back_to_surveys() {
    let kv = Arc::new(SlowStore::default());
    let store = SurveyStore::new(SurveyLoader::new(repo(&["state_of_js"], 2)), Environment::Test)
        .with_kv_store(Arc::clone(&kv) as Arc<dyn KeyValueStore>);
    store.reload().await.unwrap();

    let all: Vec<Survey> = serde_json::from_str(&kv.get(ALL_SURVEYS_KEY).await.unwrap()).unwrap();
    assert_eq!(all, store.get().to_vec());

    let metadata: serde_json::Value =
        serde_json::from_str(&kv.get(ALL_SURVEYS_METADATA_KEY).await.unwrap()).unwrap();
    assert!(metadata[0]["editions"][1].get("sections").is_none());
}

//! Derivation and writing of cache entries
//!
//! Three key families are written per reload:
//!
//! - [`ALL_SURVEYS_KEY`]: the surveys as loaded
//! - [`ALL_SURVEYS_METADATA_KEY`]: editions without `sections`/`apiSections`
//! - [`edition_key`]: one entry per edition with a `survey` back-reference
//!
//! Every key is attempted; failures are reported and the rest still land.

use crate::error::CacheWriteError;
use crate::keys::{edition_key, ALL_SURVEYS_KEY, ALL_SURVEYS_METADATA_KEY};
use crate::kv::KeyValueStore;
use serde::Serialize;
use serde_json::{Map, Value};
use survey_model::{Edition, Survey};
use tracing::{debug, info, warn};

const EDITIONS_FIELD: &str = "editions";
const SURVEY_FIELD: &str = "survey";
const OUTLINE_FIELDS: [&str; 2] = ["sections", "apiSections"];

/// Outcome of one population pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulateReport {
    /// Keys written successfully, in write order
    pub written: Vec<String>,
    /// Keys that could not be written
    pub failed: Vec<CacheWriteError>,
}

impl PopulateReport {
    /// Check if every key was written
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    fn record(&mut self, key: String, result: Result<(), CacheWriteError>) {
        match result {
            Ok(()) => {
                debug!(key = %key, "cache key written");
                self.written.push(key);
            }
            Err(err) => {
                warn!(key = %err.key, error = %err.message, "cache write failed");
                self.failed.push(err);
            }
        }
    }
}

/// Survey serialized without its editions
fn survey_header(survey: &Survey) -> Result<Value, serde_json::Error> {
    let mut value = to_object(survey)?;
    value.remove(EDITIONS_FIELD);
    Ok(Value::Object(value))
}

fn edition_metadata(edition: &Edition) -> Result<Value, serde_json::Error> {
    let mut value = to_object(edition)?;
    for field in OUTLINE_FIELDS {
        value.remove(field);
    }
    Ok(Value::Object(value))
}

fn to_object<T: Serialize>(value: &T) -> Result<Map<String, Value>, serde_json::Error> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Err(serde::ser::Error::custom("expected a JSON object")),
    }
}

/// Surveys with edition outlines removed
///
/// # Errors
///
/// Returns the serialization error of the first survey that fails.
pub fn surveys_metadata(surveys: &[Survey]) -> Result<Value, serde_json::Error> {
    surveys
        .iter()
        .map(|survey| {
            let editions = survey
                .editions
                .iter()
                .map(edition_metadata)
                .collect::<Result<Vec<_>, _>>()?;
            let mut header = to_object(survey)?;
            header.insert(EDITIONS_FIELD.to_string(), Value::Array(editions));
            Ok(Value::Object(header))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

/// Edition entry carrying its parent survey without editions
///
/// # Errors
///
/// Returns the serialization error if either side cannot be encoded.
pub fn edition_entry(survey: &Survey, edition: &Edition) -> Result<Value, serde_json::Error> {
    let mut entry = to_object(edition)?;
    entry.insert(SURVEY_FIELD.to_string(), survey_header(survey)?);
    Ok(Value::Object(entry))
}

async fn write(
    store: &dyn KeyValueStore,
    key: &str,
    value: Result<Value, serde_json::Error>,
) -> Result<(), CacheWriteError> {
    let text = value
        .and_then(|v| serde_json::to_string(&v))
        .map_err(|err| CacheWriteError::new(key, err))?;
    store.set(key, text).await
}

/// Write every cache entry derived from `surveys`
///
/// Writes are sequential so a reload never interleaves its own keys.
pub async fn populate(store: &dyn KeyValueStore, surveys: &[Survey]) -> PopulateReport {
    let mut report = PopulateReport::default();

    let all = serde_json::to_value(surveys);
    let result = write(store, ALL_SURVEYS_KEY, all).await;
    report.record(ALL_SURVEYS_KEY.to_string(), result);

    let metadata = surveys_metadata(surveys);
    let result = write(store, ALL_SURVEYS_METADATA_KEY, metadata).await;
    report.record(ALL_SURVEYS_METADATA_KEY.to_string(), result);

    for survey in surveys {
        for edition in &survey.editions {
            let key = edition_key(&edition.id);
            let result = write(store, &key, edition_entry(survey, edition)).await;
            report.record(key, result);
        }
    }

    info!(
        surveys = surveys.len(),
        written = report.written.len(),
        failed = report.failed.len(),
        "cache populated"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MokaStore;
    use pretty_assertions::assert_eq;
    use survey_test_utils::survey_with_editions;

    #[tokio::test]
    async fn writes_three_key_families() {
        let store = MokaStore::default();
        let surveys = vec![survey_with_editions("state_of_js", "js", 2)];

        let report = populate(&store, &surveys).await;

        assert!(report.is_complete());
        assert_eq!(
            report.written,
            ["surveys_all", "surveys_all_metadata", "surveys_js1", "surveys_js2"]
        );
    }

    #[test]
    fn metadata_drops_outlines() {
        let surveys = vec![survey_with_editions("state_of_js", "js", 1)];
        let metadata = surveys_metadata(&surveys).unwrap();

        let edition = &metadata[0]["editions"][0];
        assert_eq!(edition["id"], "js1");
        assert!(edition.get("sections").is_none());
        assert!(edition.get("apiSections").is_none());
        assert_eq!(metadata[0]["id"], "state_of_js");
    }

    #[test]
    fn edition_entry_has_survey_without_editions() {
        let survey = survey_with_editions("state_of_js", "js", 2);
        let entry = edition_entry(&survey, &survey.editions[1]).unwrap();

        assert_eq!(entry["id"], "js2");
        assert!(entry["sections"].is_array());
        assert_eq!(entry["survey"]["id"], "state_of_js");
        assert!(entry["survey"].get("editions").is_none());
    }
}

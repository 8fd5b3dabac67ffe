//! In-memory survey repository

use super::{join, DirEntry, EntryKind, SurveySource};
use crate::error::FetchError;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Source backed by a map of `/`-separated paths to file contents
///
/// Directories are implied by the file paths.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<String, String>,
}

impl MemorySource {
    /// Create empty source
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file
    #[must_use]
    pub fn with_file(mut self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    /// Add or replace a file
    pub fn insert(&mut self, path: impl Into<String>, contents: impl Into<String>) {
        self.files.insert(path.into(), contents.into());
    }

    /// Number of files
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if source holds no files
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[async_trait]
impl SurveySource for MemorySource {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>, FetchError> {
        let prefix = if path.is_empty() {
            String::new()
        } else {
            format!("{path}/")
        };

        let mut entries: BTreeMap<&str, EntryKind> = BTreeMap::new();
        for key in self.files.keys() {
            let Some(rest) = key.strip_prefix(&prefix) else {
                continue;
            };
            match rest.split_once('/') {
                Some((dir, _)) => {
                    entries.insert(dir, EntryKind::Dir);
                }
                None => {
                    entries.entry(rest).or_insert(EntryKind::File);
                }
            }
        }

        if entries.is_empty() && !path.is_empty() {
            return Err(FetchError::NotFound {
                path: path.to_string(),
            });
        }

        Ok(entries
            .into_iter()
            .map(|(name, kind)| DirEntry {
                name: name.to_string(),
                path: join(path, name),
                kind,
                download_url: None,
            })
            .collect())
    }

    async fn read_file(&self, entry: &DirEntry) -> Result<String, FetchError> {
        self.files
            .get(&entry.path)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                path: entry.path.clone(),
            })
    }
}

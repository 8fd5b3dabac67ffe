//! Local mirror of the survey repository

use super::{join, DirEntry, EntryKind, SurveySource};
use crate::error::FetchError;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Entries never treated as survey content
pub const EXCLUDED_NAMES: [&str; 2] = [".git", ".DS_Store"];

/// Filesystem-backed source
#[derive(Debug, Clone)]
pub struct LocalSource {
    root: PathBuf,
}

impl LocalSource {
    /// Create source rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        path.split('/')
            .filter(|part| !part.is_empty())
            .fold(self.root.clone(), |acc, part| acc.join(part))
    }
}

fn io_error(path: &str, source: std::io::Error) -> FetchError {
    if source.kind() == ErrorKind::NotFound {
        FetchError::NotFound {
            path: path.to_string(),
        }
    } else {
        FetchError::Io {
            path: path.to_string(),
            source,
        }
    }
}

#[async_trait]
impl SurveySource for LocalSource {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>, FetchError> {
        let dir = self.resolve(path);
        debug!(dir = %dir.display(), "listing directory");

        let mut reader = tokio::fs::read_dir(&dir).await.map_err(|e| io_error(path, e))?;
        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await.map_err(|e| io_error(path, e))? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if EXCLUDED_NAMES.contains(&name.as_str()) {
                continue;
            }
            let file_type = entry.file_type().await.map_err(|e| io_error(path, e))?;
            let kind = if file_type.is_dir() {
                EntryKind::Dir
            } else {
                EntryKind::File
            };
            entries.push(DirEntry {
                path: join(path, &name),
                name,
                kind,
                download_url: None,
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn read_file(&self, entry: &DirEntry) -> Result<String, FetchError> {
        tokio::fs::read_to_string(self.resolve(&entry.path))
            .await
            .map_err(|e| io_error(&entry.path, e))
    }
}

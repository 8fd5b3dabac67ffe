//! Survey sources
//!
//! A [`SurveySource`] lists directories and reads files of a survey
//! repository. The loader only reads files it has seen in a listing, so
//! every source shares one traversal and one tolerance policy.

mod github;
mod local;
mod memory;

pub use github::{GithubConfig, GithubSource, DEFAULT_PER_PAGE};
pub use local::{LocalSource, EXCLUDED_NAMES};
pub use memory::MemorySource;

use crate::error::FetchError;
use async_trait::async_trait;

/// Kind of directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory
    Dir,
}

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Base name
    pub name: String,
    /// Path relative to the source root, `/`-separated
    pub path: String,
    /// File or directory
    pub kind: EntryKind,
    /// Direct download location, when the source provides one
    pub download_url: Option<String>,
}

impl DirEntry {
    /// Create file entry
    pub fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: EntryKind::File,
            download_url: None,
        }
    }

    /// Create directory entry
    pub fn dir(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: EntryKind::Dir,
            download_url: None,
        }
    }

    /// Check if entry is a directory
    #[inline]
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    /// Draft or disabled content, named with a leading `_`
    #[inline]
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        self.name.starts_with('_')
    }
}

/// Read access to a survey repository
#[async_trait]
pub trait SurveySource: Send + Sync {
    /// Source name for logs
    fn name(&self) -> &'static str;

    /// List `path` (`""` is the root), in a stable order
    async fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>, FetchError>;

    /// Read a file previously returned by [`list_dir`](Self::list_dir)
    async fn read_file(&self, entry: &DirEntry) -> Result<String, FetchError>;
}

/// Join a parent path and a child name
pub(crate) fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

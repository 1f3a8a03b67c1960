//! # Repository Content Sources
//!
//! This module abstracts the remote provider that serves directory listings and
//! file contents for a repository. The tree walker only ever talks to the
//! [`ContentSource`] trait, so the GitHub client can be swapped for the
//! in-memory source in tests.
//!
//! ## Key Components
//!
//! - `ContentSource`: listing and file-read capability
//! - `DirectoryEntry`: one item of a directory listing
//! - `GitHubSource`: implementation backed by the GitHub contents API
//! - `MemorySource`: implementation backed by an in-memory file map
//!
//! Failures are never retried here; they propagate to the caller unchanged.

mod error;
pub mod github;
pub mod memory;

pub use error::SourceError;
pub use github::GitHubSource;
pub use memory::MemorySource;

use std::future::Future;

use crate::repository::RepositoryReference;

/// Kind of a directory listing entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file (symlinks and submodules are treated as files too)
    File,

    /// Directory that can be listed further
    Directory,
}

/// One item returned by [`ContentSource::list_directory`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// File or directory name
    pub name: String,

    /// Path relative to the repository root
    pub path: String,

    /// Whether the entry is a file or a directory
    pub kind: EntryKind,

    /// Size in bytes, when the provider reports it
    pub size: Option<u64>,
}

impl DirectoryEntry {
    /// Create a file entry
    pub fn file(name: impl Into<String>, path: impl Into<String>, size: Option<u64>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: EntryKind::File,
            size,
        }
    }

    /// Create a directory entry
    pub fn directory(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: EntryKind::Directory,
            size: None,
        }
    }

    /// Whether this entry is a directory
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Capability serving directory listings and file text for a repository
pub trait ContentSource: Send + Sync {
    /// List the entries of `path`, in the order the provider returns them.
    /// The empty path denotes the repository root.
    fn list_directory(
        &self,
        repo: &RepositoryReference,
        path: &str,
    ) -> impl Future<Output = Result<Vec<DirectoryEntry>, SourceError>> + Send;

    /// Read the file at `path` as text
    fn read_file(
        &self,
        repo: &RepositoryReference,
        path: &str,
    ) -> impl Future<Output = Result<String, SourceError>> + Send;
}

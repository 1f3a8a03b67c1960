//! # In-memory Content Source
//!
//! Serves a repository tree from a map of file paths to contents. Directories
//! are implied by the file paths. Listings come back in lexicographic order,
//! the order GitHub uses. Individual paths can be configured to fail so that
//! error propagation can be exercised without a network.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{ContentSource, DirectoryEntry, SourceError};
use crate::repository::RepositoryReference;

/// Content source backed by an in-memory file map
#[derive(Debug, Default)]
pub struct MemorySource {
    files: BTreeMap<String, Vec<u8>>,
    failing: HashSet<String>,
    hide_sizes: bool,
    reads: AtomicUsize,
}

impl MemorySource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text file at `path`
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into().into_bytes());
        self
    }

    /// Add a file with raw bytes at `path`
    pub fn with_bytes(mut self, path: impl Into<String>, content: Vec<u8>) -> Self {
        self.files.insert(path.into(), content);
        self
    }

    /// Make listing or reading `path` fail with `SourceError::Api`
    pub fn failing_on(mut self, path: impl Into<String>) -> Self {
        self.failing.insert(path.into());
        self
    }

    /// List files without a size, as providers that omit it do
    pub fn without_sizes(mut self) -> Self {
        self.hide_sizes = true;
        self
    }

    /// Number of `read_file` calls served so far
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn check_failure(&self, path: &str) -> Result<(), SourceError> {
        if self.failing.contains(path) {
            return Err(SourceError::Api {
                status_code: 500,
                message: format!("injected failure for {:?}", path),
            });
        }
        Ok(())
    }

    fn entries(&self, dir: &str) -> Option<Vec<DirectoryEntry>> {
        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{}/", dir)
        };

        let mut dirs = BTreeSet::new();
        let mut files = BTreeMap::new();
        for (path, content) in &self.files {
            let Some(rest) = path.strip_prefix(&prefix) else {
                continue;
            };
            match rest.split_once('/') {
                Some((child, _)) => {
                    dirs.insert(child.to_string());
                }
                None => {
                    files.insert(rest.to_string(), content.len() as u64);
                }
            }
        }

        if dirs.is_empty() && files.is_empty() && !dir.is_empty() {
            return None;
        }

        let mut names: BTreeMap<String, DirectoryEntry> = BTreeMap::new();
        for name in dirs {
            let path = format!("{}{}", prefix, name);
            names.insert(name.clone(), DirectoryEntry::directory(name, path));
        }
        for (name, size) in files {
            let path = format!("{}{}", prefix, name);
            let size = (!self.hide_sizes).then_some(size);
            names.insert(name.clone(), DirectoryEntry::file(name, path, size));
        }
        Some(names.into_values().collect())
    }
}

impl ContentSource for MemorySource {
    async fn list_directory(
        &self,
        _repo: &RepositoryReference,
        path: &str,
    ) -> Result<Vec<DirectoryEntry>, SourceError> {
        self.check_failure(path)?;
        self.entries(path)
            .ok_or_else(|| SourceError::NotFound(path.to_string()))
    }

    async fn read_file(
        &self,
        _repo: &RepositoryReference,
        path: &str,
    ) -> Result<String, SourceError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check_failure(path)?;
        let bytes = self
            .files
            .get(path)
            .ok_or_else(|| SourceError::NotFound(path.to_string()))?;
        String::from_utf8(bytes.clone()).map_err(|e| SourceError::Decode(format!("{}: {}", path, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::EntryKind;

    fn repo() -> RepositoryReference {
        RepositoryReference::parse("https://github.com/acme/widget").unwrap()
    }

    #[tokio::test]
    async fn test_listing_is_lexicographic_and_derives_directories() {
        let source = MemorySource::new()
            .with_file("src/main.go", "package main")
            .with_file("README.md", "# widget")
            .with_file("src/util/strings.go", "package util")
            .with_file("Makefile", "all:");

        let root = source.list_directory(&repo(), "").await.unwrap();
        let names: Vec<_> = root.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Makefile", "README.md", "src"]);
        assert_eq!(root[2].kind, EntryKind::Directory);

        let src = source.list_directory(&repo(), "src").await.unwrap();
        assert_eq!(src[0], DirectoryEntry::file("main.go", "src/main.go", Some(12)));
        assert_eq!(src[1], DirectoryEntry::directory("util", "src/util"));
    }

    #[tokio::test]
    async fn test_missing_and_failing_paths() {
        let source = MemorySource::new()
            .with_file("a/b.py", "print()")
            .failing_on("a");

        assert!(matches!(
            source.list_directory(&repo(), "nope").await,
            Err(SourceError::NotFound(_))
        ));
        assert!(matches!(
            source.list_directory(&repo(), "a").await,
            Err(SourceError::Api { .. })
        ));
        assert_eq!(source.read_file(&repo(), "a/b.py").await.unwrap(), "print()");
        assert_eq!(source.read_count(), 1);
    }

    #[tokio::test]
    async fn test_without_sizes_omits_file_sizes() {
        let source = MemorySource::new()
            .with_file("lib/a.go", "package a")
            .without_sizes();

        let lib = source.list_directory(&repo(), "lib").await.unwrap();
        assert_eq!(lib, vec![DirectoryEntry::file("a.go", "lib/a.go", None)]);
    }

    #[tokio::test]
    async fn test_binary_content_fails_to_decode() {
        let source = MemorySource::new().with_bytes("blob.c", vec![0xff, 0xfe]);
        assert!(matches!(
            source.read_file(&repo(), "blob.c").await,
            Err(SourceError::Decode(_))
        ));
    }
}

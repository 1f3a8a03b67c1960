//! # Artifact Persistence
//!
//! Each summary run writes four plain-text artifacts to fixed file names in
//! the output directory, overwriting earlier runs. These files are the only
//! state shared between runs; `refine` reads them back.
//!
//! Writes are attempted independently and every failure is reported. Reads
//! never fail: an unreadable artifact recovers as an empty string and is
//! listed as missing, so callers can tell "absent" from "empty".

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info, instrument, warn};

use crate::assembler::SummaryResult;

/// One of the four persisted artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Combined summary document
    Combined,

    /// README body
    Readme,

    /// Plain structure outline
    Structure,

    /// Annotated structure outline
    StructureDetail,
}

impl ArtifactKind {
    /// Every artifact, in write order
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::Combined,
        ArtifactKind::Readme,
        ArtifactKind::Structure,
        ArtifactKind::StructureDetail,
    ];

    /// File name relative to the output directory
    pub fn file_name(self) -> &'static str {
        match self {
            ArtifactKind::Combined => "code_summary.txt",
            ArtifactKind::Readme => "readme.txt",
            ArtifactKind::Structure => "structure.txt",
            ArtifactKind::StructureDetail => "structure_detail.txt",
        }
    }

    fn select(self, result: &SummaryResult) -> &str {
        match self {
            ArtifactKind::Combined => &result.combined,
            ArtifactKind::Readme => &result.readme,
            ArtifactKind::Structure => &result.structure,
            ArtifactKind::StructureDetail => &result.structure_detail,
        }
    }

    fn select_mut(self, result: &mut SummaryResult) -> &mut String {
        match self {
            ArtifactKind::Combined => &mut result.combined,
            ArtifactKind::Readme => &mut result.readme,
            ArtifactKind::Structure => &mut result.structure,
            ArtifactKind::StructureDetail => &mut result.structure_detail,
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// A single failed artifact write
#[derive(Debug)]
pub struct WriteFailure {
    pub kind: ArtifactKind,
    pub error: io::Error,
}

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to write {}", describe(.failures))]
    WriteFailed { failures: Vec<WriteFailure> },
}

fn describe(failures: &[WriteFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{} ({})", f.kind, f.error))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Artifacts read back from disk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recovered {
    /// Recovered texts; missing artifacts are empty strings
    pub result: SummaryResult,

    /// Artifacts that could not be read
    pub missing: Vec<ArtifactKind>,
}

impl Recovered {
    /// Whether `kind` was read from disk
    pub fn is_present(&self, kind: ArtifactKind) -> bool {
        !self.missing.contains(&kind)
    }
}

/// Reads and writes the artifacts under one directory
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    base_path: PathBuf,
}

impl Default for ArtifactStore {
    fn default() -> Self {
        Self::new(".")
    }
}

impl ArtifactStore {
    /// Create a store rooted at `base_path`
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Directory holding the artifacts
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Full path of one artifact
    pub fn path_of(&self, kind: ArtifactKind) -> PathBuf {
        self.base_path.join(kind.file_name())
    }

    /// Write all four artifacts, overwriting existing files.
    ///
    /// A failed write does not stop the remaining ones; all failures are
    /// returned together.
    #[instrument(skip(self, result), fields(base_path = %self.base_path.display()))]
    pub async fn persist(&self, result: &SummaryResult) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_path).await?;

        let mut failures = Vec::new();
        for kind in ArtifactKind::ALL {
            let path = self.path_of(kind);
            match fs::write(&path, kind.select(result)).await {
                Ok(()) => debug!("Wrote {}", path.display()),
                Err(error) => {
                    warn!("Failed to write {}: {}", path.display(), error);
                    failures.push(WriteFailure { kind, error });
                }
            }
        }

        if failures.is_empty() {
            info!("Persisted {} artifacts", ArtifactKind::ALL.len());
            Ok(())
        } else {
            Err(StorageError::WriteFailed { failures })
        }
    }

    /// Read all four artifacts back
    #[instrument(skip(self), fields(base_path = %self.base_path.display()))]
    pub async fn recover(&self) -> Recovered {
        let mut recovered = Recovered::default();

        for kind in ArtifactKind::ALL {
            let path = self.path_of(kind);
            match fs::read_to_string(&path).await {
                Ok(text) => *kind.select_mut(&mut recovered.result) = text,
                Err(error) => {
                    if error.kind() == io::ErrorKind::NotFound {
                        debug!("{} not found", path.display());
                    } else {
                        warn!("Failed to read {}: {}", path.display(), error);
                    }
                    recovered.missing.push(kind);
                }
            }
        }

        recovered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> SummaryResult {
        SummaryResult::assemble(
            "# Widget\n\n中文说明\n",
            "widget\n└── main.go\n",
            "- main.go\n  Summarized code for main.go\n\n入口函数\n",
        )
    }

    #[tokio::test]
    async fn test_round_trip_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());
        let result = sample();

        store.persist(&result).await.unwrap();
        let recovered = store.recover().await;

        assert_eq!(recovered.result, result);
        assert!(recovered.missing.is_empty());
        for kind in ArtifactKind::ALL {
            assert_eq!(
                std::fs::read(store.path_of(kind)).unwrap(),
                kind.select(&result).as_bytes()
            );
        }
    }

    #[tokio::test]
    async fn test_persist_overwrites_previous_run() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());

        store.persist(&sample()).await.unwrap();
        let second = SummaryResult::assemble("short", "", "");
        store.persist(&second).await.unwrap();

        assert_eq!(store.recover().await.result, second);
    }

    #[tokio::test]
    async fn test_missing_and_empty_are_distinguished() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());
        std::fs::write(store.path_of(ArtifactKind::Structure), "").unwrap();

        let recovered = store.recover().await;

        assert!(recovered.is_present(ArtifactKind::Structure));
        assert!(!recovered.is_present(ArtifactKind::StructureDetail));
        assert_eq!(recovered.result.structure, "");
        assert_eq!(recovered.result.structure_detail, "");
        assert_eq!(recovered.missing.len(), 3);
    }

    #[tokio::test]
    async fn test_failed_write_does_not_stop_others() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());
        // A directory in place of the readme file makes that write fail.
        std::fs::create_dir(store.path_of(ArtifactKind::Readme)).unwrap();

        let err = store.persist(&sample()).await.unwrap_err();

        match &err {
            StorageError::WriteFailed { failures } => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].kind, ArtifactKind::Readme);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("readme.txt"));
        assert!(store.path_of(ArtifactKind::StructureDetail).is_file());
        assert!(store.path_of(ArtifactKind::Combined).is_file());
    }

    #[tokio::test]
    async fn test_persist_creates_output_dir() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path().join("out/nested"));

        store.persist(&sample()).await.unwrap();
        assert!(store.path_of(ArtifactKind::Combined).is_file());
    }
}

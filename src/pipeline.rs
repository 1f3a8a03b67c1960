//! # Summary and Refine Runs
//!
//! Ties the components together for the two CLI commands.
//!
//! ## Summary
//!
//! 1. Parse the repository reference
//! 2. Fetch `README.md` (fatal on failure)
//! 3. Walk the tree, summarizing eligible files
//! 4. Beautify the structure (falls back to the plain outline)
//! 5. Assemble the combined document
//! 6. Persist the four artifacts
//!
//! ## Refine
//!
//! Loads the artifacts of an earlier run and checks the structure detail is
//! there. No refinement pass is defined beyond that check.

use tokio::sync::mpsc;
use tracing::{info, instrument};

use crate::assembler::SummaryResult;
use crate::error::{Error, Result};
use crate::model::Summarizer;
use crate::repository::RepositoryReference;
use crate::source::ContentSource;
use crate::storage::{ArtifactKind, ArtifactStore, Recovered};
use crate::summarize::beautify_or_original;
use crate::walker::{SummaryFailure, TreeWalker, WalkEvent};

/// Path of the README fetched for the purpose section
pub const README_PATH: &str = "README.md";

/// Outcome of a summary run
#[derive(Debug, Clone)]
pub struct SummaryRun {
    /// The assembled and persisted result
    pub result: SummaryResult,

    /// Files whose summaries failed and were embedded as failure lines
    pub failures: Vec<SummaryFailure>,
}

/// Runs the summary pipeline against one content source and summarizer
pub struct Digest<S, M> {
    source: S,
    summarizer: M,
    store: ArtifactStore,
    max_input_length: usize,
    progress: Option<mpsc::Sender<WalkEvent>>,
}

impl<S, M> Digest<S, M>
where
    S: ContentSource,
    M: Summarizer,
{
    pub fn new(source: S, summarizer: M, store: ArtifactStore, max_input_length: usize) -> Self {
        Self {
            source,
            summarizer,
            store,
            max_input_length,
            progress: None,
        }
    }

    /// Forward walk progress to `sender`
    pub fn with_progress(mut self, sender: mpsc::Sender<WalkEvent>) -> Self {
        self.progress = Some(sender);
        self
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Run the full pipeline for the repository at `location`
    #[instrument(skip(self))]
    pub async fn summarize(&mut self, location: &str) -> Result<SummaryRun> {
        let repo = RepositoryReference::parse(location)?;
        info!("Summarizing {}", repo);

        let readme = self.source.read_file(&repo, README_PATH).await?;

        let mut walker = TreeWalker::new(&self.source, &self.summarizer, self.max_input_length);
        if let Some(sender) = self.progress.take() {
            walker = walker.with_progress(sender);
        }
        let walked = walker.walk(&repo, "").await?;
        drop(walker);

        let structure = beautify_or_original(&self.summarizer, &walked.structure).await;
        let result = SummaryResult::assemble(readme, structure, walked.structure_detail);

        self.store.persist(&result).await?;

        Ok(SummaryRun {
            result,
            failures: walked.failures,
        })
    }
}

/// Load the artifacts of an earlier run for refinement.
///
/// Fails with [`Error::MissingArtifact`] when the structure detail is absent
/// or empty.
#[instrument(skip(store), fields(base_path = %store.base_path().display()))]
pub async fn refine(store: &ArtifactStore) -> Result<Recovered> {
    let recovered = store.recover().await;

    let kind = ArtifactKind::StructureDetail;
    if !recovered.is_present(kind) {
        return Err(Error::MissingArtifact(format!(
            "{} not found; run `summary` first",
            store.path_of(kind).display()
        )));
    }
    if recovered.result.structure_detail.trim().is_empty() {
        return Err(Error::MissingArtifact(format!(
            "{} is empty",
            store.path_of(kind).display()
        )));
    }

    info!(
        "Loaded {} bytes of structure detail",
        recovered.result.structure_detail.len()
    );
    Ok(recovered)
}

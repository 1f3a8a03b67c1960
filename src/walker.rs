//! # Repository Tree Walker
//!
//! Enumerates a repository through a [`ContentSource`] and renders it twice:
//! a plain `- name` outline and the same outline annotated after each eligible
//! file with its summary, a too-long marker, or a summarization failure.
//!
//! ## Traversal
//!
//! The walk is a pre-order depth-first traversal over an explicit stack of
//! `(entry, level)` pairs. A directory is listed when it is popped and its
//! children are pushed in reverse so they come off the stack in listing order.
//! Calls are made one at a time.
//!
//! ## Failure model
//!
//! - Listing or read failures abort the whole walk with the first error.
//! - Summarization failures are recorded in [`WalkOutput::failures`] and
//!   embedded at the file's annotation position; the walk continues.
//!
//! Every annotation is a single line: multi-line model replies are joined
//! with spaces so they cannot add `- name` lines to the detail outline.

use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::classify::is_eligible;
use crate::error::Result;
use crate::model::Summarizer;
use crate::repository::RepositoryReference;
use crate::source::{ContentSource, DirectoryEntry};
use crate::summarize::summarize_file;

/// Marker written instead of a summary for files over the size gate
pub const TOO_LONG_MARKER: &str = "[File too long to summarize]";

/// Indentation unit per directory level
const INDENT: &str = "  ";

/// Progress notifications sent while walking
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkEvent {
    /// A directory is being listed
    Listing { path: String },

    /// A file summary was generated
    Summarized { path: String },

    /// A file was over the size gate
    TooLong { path: String },

    /// Summarizing a file failed
    Failed { path: String },
}

/// A file whose summary could not be generated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryFailure {
    /// Repository path of the file
    pub path: String,

    /// Error reported by the summarizer
    pub reason: String,
}

/// Result of a walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkOutput {
    /// Name-only outline
    pub structure: String,

    /// Outline with per-file annotations
    pub structure_detail: String,

    /// Files whose summaries failed
    pub failures: Vec<SummaryFailure>,
}

/// Walks a repository and summarizes its eligible files
pub struct TreeWalker<'a, S, M> {
    source: &'a S,
    summarizer: &'a M,
    max_length: usize,
    progress: Option<mpsc::Sender<WalkEvent>>,
}

impl<'a, S, M> TreeWalker<'a, S, M>
where
    S: ContentSource,
    M: Summarizer,
{
    /// Create a walker; files longer than `max_length` bytes are not summarized
    pub fn new(source: &'a S, summarizer: &'a M, max_length: usize) -> Self {
        Self {
            source,
            summarizer,
            max_length,
            progress: None,
        }
    }

    /// Send a [`WalkEvent`] for every directory listed and file annotated
    pub fn with_progress(mut self, sender: mpsc::Sender<WalkEvent>) -> Self {
        self.progress = Some(sender);
        self
    }

    /// Walk the tree below `path` starting at indentation level 0
    pub async fn walk(&self, repo: &RepositoryReference, path: &str) -> Result<WalkOutput> {
        self.walk_at_level(repo, path, 0).await
    }

    /// Walk the tree below `path`, indenting its entries by `level`
    #[instrument(skip(self, repo), fields(repo = %repo))]
    pub async fn walk_at_level(
        &self,
        repo: &RepositoryReference,
        path: &str,
        level: usize,
    ) -> Result<WalkOutput> {
        let mut output = WalkOutput::default();
        let mut stack: Vec<(DirectoryEntry, usize)> = Vec::new();

        let root = self.list(repo, path).await?;
        push_children(&mut stack, root, level);

        while let Some((entry, level)) = stack.pop() {
            let indent = INDENT.repeat(level);
            let line = format!("{}- {}\n", indent, entry.name);
            output.structure.push_str(&line);
            output.structure_detail.push_str(&line);

            if entry.is_dir() {
                let children = self.list(repo, &entry.path).await?;
                push_children(&mut stack, children, level + 1);
            } else if is_eligible(&entry.name) {
                self.annotate(repo, &entry, &indent, &mut output).await?;
            }
        }

        info!(
            "Walked {} entries, {} summary failures",
            output.structure.lines().count(),
            output.failures.len()
        );
        Ok(output)
    }

    async fn list(&self, repo: &RepositoryReference, path: &str) -> Result<Vec<DirectoryEntry>> {
        self.notify(WalkEvent::Listing {
            path: path.to_string(),
        })
        .await;
        Ok(self.source.list_directory(repo, path).await?)
    }

    /// Append the annotation for an eligible file to the detail outline
    async fn annotate(
        &self,
        repo: &RepositoryReference,
        entry: &DirectoryEntry,
        indent: &str,
        output: &mut WalkOutput,
    ) -> Result<()> {
        let reported_too_long = entry
            .size
            .is_some_and(|size| size > self.max_length as u64);

        let code = if reported_too_long {
            None
        } else {
            Some(self.source.read_file(repo, &entry.path).await?)
        };

        let code = match code {
            Some(code) if code.len() <= self.max_length => code,
            _ => {
                debug!("Skipping {}: longer than {} bytes", entry.path, self.max_length);
                output
                    .structure_detail
                    .push_str(&format!("{}{}{}\n", indent, INDENT, TOO_LONG_MARKER));
                self.notify(WalkEvent::TooLong {
                    path: entry.path.clone(),
                })
                .await;
                return Ok(());
            }
        };

        match summarize_file(self.summarizer, &entry.name, &code).await {
            Ok(summary) => {
                output
                    .structure_detail
                    .push_str(&format!("{}{}{}\n", indent, INDENT, one_line(&summary)));
                self.notify(WalkEvent::Summarized {
                    path: entry.path.clone(),
                })
                .await;
            }
            Err(e) => {
                warn!("Failed to summarize {}: {}", entry.path, e);
                output.structure_detail.push_str(&format!(
                    "{}{}Summarization failed for {}: {}\n",
                    indent,
                    INDENT,
                    entry.name,
                    one_line(&e.to_string())
                ));
                output.failures.push(SummaryFailure {
                    path: entry.path.clone(),
                    reason: e.to_string(),
                });
                self.notify(WalkEvent::Failed {
                    path: entry.path.clone(),
                })
                .await;
            }
        }
        Ok(())
    }

    async fn notify(&self, event: WalkEvent) {
        if let Some(sender) = &self.progress {
            // A dropped receiver only means nobody is watching.
            let _ = sender.send(event).await;
        }
    }
}

/// Collapse generated text onto a single annotation line
fn one_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn push_children(stack: &mut Vec<(DirectoryEntry, usize)>, entries: Vec<DirectoryEntry>, level: usize) {
    stack.extend(entries.into_iter().rev().map(|entry| (entry, level)));
}

//! # repo-digest - Repository Summaries with an LLM
//!
//! This crate walks a remote repository's directory tree, fetches its source
//! files and produces a readable summary of what the repository is for and
//! how it is laid out. A text-generation service describes individual files
//! and redraws the directory outline as a tree diagram.
//!
//! ## Features
//!
//! - Pluggable content sources (GitHub contents API, in-memory)
//! - Extension-based selection of source files, with a per-file size gate
//! - Two renderings of the tree: plain outline and per-file detail
//! - Soft handling of generation failures; source failures abort the run
//! - Four plain-text artifacts that later runs can read back
//! - Rate-limited generation through rig completion models
//!
//! ## Example
//!
//! ```rust,no_run
//! use repo_digest::config::DigestConfig;
//! use repo_digest::model::CompletionSummarizer;
//! use repo_digest::pipeline::Digest;
//! use repo_digest::source::GitHubSource;
//! use repo_digest::storage::ArtifactStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DigestConfig::from_env()?;
//!     let source = GitHubSource::new(config.source_token.clone())?;
//!     let summarizer = CompletionSummarizer::from_config(&config)?;
//!     let store = ArtifactStore::new(&config.output_dir);
//!
//!     let mut digest = Digest::new(source, summarizer, store, config.max_input_length);
//!     let run = digest.summarize("https://github.com/acme/widget").await?;
//!
//!     println!("{}", run.result.combined);
//!     Ok(())
//! }
//! ```

mod error;

pub mod assembler;
pub mod classify;
pub mod config;
pub mod model;
pub mod pipeline;
pub mod repository;
pub mod source;
pub mod storage;
pub mod summarize;
pub mod walker;

pub use error::Error;

/// Re-export of types module for public use
pub mod prelude {
    pub use crate::assembler::SummaryResult;
    pub use crate::error::Error;
    pub use crate::error::Result;
    pub use crate::repository::RepositoryReference;
}

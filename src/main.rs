//! # repo-digest CLI
//!
//! Command-line front end for the repository summarizer.
//!
//! ## Commands
//!
//! - `summary <repository-url>`: walk the repository, summarize its files,
//!   persist the four artifacts and print the combined summary
//! - `refine`: load the artifacts of an earlier run and check the structure
//!   detail is present
//!
//! Configuration comes from the environment (see `repo_digest::config`).
//! Any failure prints a diagnostic and exits with a nonzero status.

mod telemetry;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use repo_digest::config::DigestConfig;
use repo_digest::model::CompletionSummarizer;
use repo_digest::pipeline::{self, Digest};
use repo_digest::source::GitHubSource;
use repo_digest::storage::ArtifactStore;
use repo_digest::walker::WalkEvent;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{instrument, warn};

#[derive(Parser)]
#[command(author, version, about = "Summarize a GitHub repository's purpose and structure with an LLM", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Summarize a repository and persist the artifacts
    Summary(SummaryArgs),

    /// Load the artifacts of a previous summary run
    Refine(RefineArgs),
}

#[derive(Args, Debug)]
struct SummaryArgs {
    /// Repository URL, e.g. https://github.com/<owner>/<repo>
    #[arg(required = true)]
    repository_url: String,

    /// Directory receiving the artifacts
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
}

#[derive(Args, Debug)]
struct RefineArgs {
    /// Directory holding the artifacts
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _otel = telemetry::init_tracing_subscriber()?;

    let config = DigestConfig::from_env()?;

    match cli.command {
        Commands::Summary(args) => {
            let config = DigestConfig {
                output_dir: args.output_dir,
                ..config
            };
            summary_command(args.repository_url, config).await?;
        }
        Commands::Refine(args) => {
            refine_command(args).await?;
        }
    }

    Ok(())
}

#[instrument(skip(config))]
async fn summary_command(repository_url: String, config: DigestConfig) -> anyhow::Result<()> {
    let source = GitHubSource::new(config.source_token.clone())?;
    let summarizer = CompletionSummarizer::from_config(&config)?;
    let store = ArtifactStore::new(&config.output_dir);

    let (progress_sender, mut progress_receiver) = mpsc::channel(100);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} [{elapsed_precise}] {pos} files {msg}")?,
    );
    spinner.enable_steady_tick(Duration::from_millis(120));

    let progress_handle = tokio::spawn({
        let spinner = spinner.clone();
        async move {
            while let Some(event) = progress_receiver.recv().await {
                match event {
                    WalkEvent::Listing { path } => {
                        spinner.set_message(format!("listing /{}", path));
                    }
                    WalkEvent::Summarized { path } => {
                        spinner.inc(1);
                        spinner.set_message(format!("summarized {}", path));
                    }
                    WalkEvent::TooLong { path } => {
                        spinner.inc(1);
                        spinner.set_message(format!("too long: {}", path));
                    }
                    WalkEvent::Failed { path } => {
                        spinner.inc(1);
                        spinner.set_message(format!("failed: {}", path));
                    }
                }
            }
            spinner.set_message("building summary");
        }
    });

    let mut digest = Digest::new(source, summarizer, store, config.max_input_length)
        .with_progress(progress_sender);
    let outcome = digest.summarize(&repository_url).await;

    // Dropping the digest releases any unused sender so the task ends.
    drop(digest);
    join_progress(progress_handle).await;
    spinner.finish_and_clear();

    let run = outcome?;
    for failure in &run.failures {
        warn!("Summary for {} failed: {}", failure.path, failure.reason);
    }

    println!("{}", run.result.combined);
    Ok(())
}

/// Wait for the spinner task; returns false when it panicked or was cancelled
async fn join_progress(handle: JoinHandle<()>) -> bool {
    match handle.await {
        Ok(()) => true,
        Err(e) => {
            warn!("Progress display task failed: {}", e);
            false
        }
    }
}

#[instrument]
async fn refine_command(args: RefineArgs) -> anyhow::Result<()> {
    let store = ArtifactStore::new(&args.output_dir);
    let recovered = pipeline::refine(&store).await?;

    println!(
        "Loaded structure detail from {} ({} bytes).",
        store.base_path().display(),
        recovered.result.structure_detail.len()
    );
    for kind in &recovered.missing {
        println!("Note: {} was not found.", store.path_of(*kind).display());
    }
    println!("No refinement pass is defined; artifacts were left unchanged.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_join_progress_reports_finished_task() {
        let handle = tokio::spawn(async {});
        assert!(join_progress(handle).await);
    }

    #[tokio::test]
    async fn test_join_progress_survives_panicking_task() {
        let handle = tokio::spawn(async {
            panic!("spinner broke");
        });
        assert!(!join_progress(handle).await);
    }
}

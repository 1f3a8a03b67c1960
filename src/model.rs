//! # Summarizer Capability
//!
//! This module provides the text-generation capability used to describe files
//! and to redraw the structure tree. Everything upstream depends only on the
//! [`Summarizer`] trait; the production implementation drives a rig completion
//! model through an agent whose preamble is the system instruction.
//!
//! ## Key Components
//!
//! - `Summarizer`: instruction + prompt in, generated text out
//! - `CompletionSummarizer`: adapter from any rig `CompletionModel`
//! - `RateLimitedCompletionModel`: wrapper throttling requests per minute
//! - `MockCompletionModel`: scriptable model for tests

use std::future::Future;
use std::num::NonZeroU32;

use governor::{Quota, RateLimiter};
use rig::agent::AgentBuilder;
use rig::completion::{CompletionModel, Prompt};
use rig::providers::openai;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::DigestConfig;
use crate::error::{Error, Result};

pub mod mock_model;
pub mod ratelimited_completion;

pub use ratelimited_completion::RateLimitedCompletionModel;

/// Error returned by a [`Summarizer`]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    /// The completion request failed
    #[error("completion failed: {0}")]
    Completion(String),

    /// The service answered with no text
    #[error("empty response")]
    EmptyResponse,
}

/// Capability turning a prompt into generated text
pub trait Summarizer: Send + Sync {
    /// Generate text for `prompt` under the system `instruction`
    fn generate(
        &self,
        instruction: &str,
        prompt: &str,
    ) -> impl Future<Output = std::result::Result<String, GenerationError>> + Send;
}

/// [`Summarizer`] backed by a rig completion model
#[derive(Debug, Clone)]
pub struct CompletionSummarizer<M: CompletionModel> {
    model: M,
}

impl<M: CompletionModel> CompletionSummarizer<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }
}

impl CompletionSummarizer<RateLimitedCompletionModel<openai::CompletionModel>> {
    /// Build a rate-limited client for an OpenAI-compatible chat endpoint
    pub fn from_config(config: &DigestConfig) -> Result<Self> {
        let requests = NonZeroU32::new(config.requests_per_minute).ok_or_else(|| {
            Error::Config("requests per minute must be greater than zero".to_string())
        })?;
        let client = openai::Client::from_url(&config.llm_api_key, &config.llm_base_url);
        let model = RateLimitedCompletionModel::new(
            client.completion_model(&config.llm_model),
            RateLimiter::direct(Quota::per_minute(requests)),
        );
        Ok(Self::new(model))
    }
}

impl<M: CompletionModel> Summarizer for CompletionSummarizer<M> {
    #[instrument(skip_all, fields(prompt_len = prompt.len()))]
    async fn generate(
        &self,
        instruction: &str,
        prompt: &str,
    ) -> std::result::Result<String, GenerationError> {
        let agent = AgentBuilder::new(self.model.clone())
            .preamble(instruction)
            .build();

        let text = agent
            .prompt(prompt)
            .await
            .map_err(|e| GenerationError::Completion(e.to_string()))?;

        debug!("Generated {} bytes", text.len());
        Ok(text)
    }
}

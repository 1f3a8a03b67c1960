//! # Configuration
//!
//! Settings read once at startup and passed explicitly to the components that
//! need them: the content-source credential, the text-generation endpoint and
//! credential, the per-file size gate, and where artifacts are written.
//!
//! ## Environment
//!
//! - `OPENAI_API_KEY`: text-generation credential (required)
//! - `LLM_BASE_URL`: OpenAI-compatible endpoint (default DeepSeek)
//! - `LLM_MODEL`: model identifier
//! - `LLM_MAX_INPUT_LENGTH`: largest file, in bytes, sent for summarization
//! - `LLM_REQUESTS_PER_MINUTE`: client-side request quota
//! - `GITHUB_TOKEN`: content-source credential (optional)

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Default per-file size gate in bytes
pub const DEFAULT_MAX_INPUT_LENGTH: usize = 4096;

/// Default OpenAI-compatible endpoint
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.deepseek.com";

/// Default model identifier
pub const DEFAULT_LLM_MODEL: &str = "deepseek-coder";

/// Default client-side quota
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 60;

/// Configuration for a digest run
#[derive(Clone)]
pub struct DigestConfig {
    /// Credential for the text-generation service
    pub llm_api_key: String,

    /// Base URL of the OpenAI-compatible chat endpoint
    pub llm_base_url: String,

    /// Model used for every generation call
    pub llm_model: String,

    /// Optional credential for the content source
    pub source_token: Option<String>,

    /// Files longer than this many bytes are marked instead of summarized
    pub max_input_length: usize,

    /// Upper bound on generation requests per minute
    pub requests_per_minute: u32,

    /// Directory receiving the persisted artifacts
    pub output_dir: PathBuf,
}

impl std::fmt::Debug for DigestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigestConfig")
            .field("llm_api_key", &"<redacted>")
            .field("llm_base_url", &self.llm_base_url)
            .field("llm_model", &self.llm_model)
            .field("source_token", &self.source_token.as_ref().map(|_| "<redacted>"))
            .field("max_input_length", &self.max_input_length)
            .field("requests_per_minute", &self.requests_per_minute)
            .field("output_dir", &self.output_dir)
            .finish()
    }
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_base_url: DEFAULT_LLM_BASE_URL.to_string(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            source_token: None,
            max_input_length: DEFAULT_MAX_INPUT_LENGTH,
            requests_per_minute: DEFAULT_REQUESTS_PER_MINUTE,
            output_dir: PathBuf::from("."),
        }
    }
}

impl DigestConfig {
    /// Create a new builder
    pub fn builder() -> DigestConfigBuilder {
        DigestConfigBuilder::new()
    }

    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable name to
    /// its value. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let llm_api_key = get("OPENAI_API_KEY").ok_or_else(|| {
            Error::Config("No LLM authorization token provided (set OPENAI_API_KEY)".to_string())
        })?;

        let mut builder = Self::builder()
            .llm_api_key(llm_api_key)
            .source_token(get("GITHUB_TOKEN"));

        if let Some(base_url) = get("LLM_BASE_URL") {
            builder = builder.llm_base_url(base_url);
        }
        if let Some(model) = get("LLM_MODEL") {
            builder = builder.llm_model(model);
        }
        if let Some(raw) = get("LLM_MAX_INPUT_LENGTH") {
            builder = builder.max_input_length(parse_var("LLM_MAX_INPUT_LENGTH", &raw)?);
        }
        if let Some(raw) = get("LLM_REQUESTS_PER_MINUTE") {
            let requests: u32 = parse_var("LLM_REQUESTS_PER_MINUTE", &raw)?;
            if requests == 0 {
                return Err(Error::Config(
                    "LLM_REQUESTS_PER_MINUTE must be greater than zero".to_string(),
                ));
            }
            builder = builder.requests_per_minute(requests);
        }

        Ok(builder.build())
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| Error::Config(format!("Error converting {}={:?}: {}", key, raw, e)))
}

/// Builder for DigestConfig
#[derive(Debug, Default)]
pub struct DigestConfigBuilder {
    config: DigestConfig,
}

impl DigestConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: DigestConfig::default(),
        }
    }

    /// Set the text-generation credential
    pub fn llm_api_key(mut self, llm_api_key: impl Into<String>) -> Self {
        self.config.llm_api_key = llm_api_key.into();
        self
    }

    /// Set the chat endpoint base URL
    pub fn llm_base_url(mut self, llm_base_url: impl Into<String>) -> Self {
        self.config.llm_base_url = llm_base_url.into();
        self
    }

    /// Set the model identifier
    pub fn llm_model(mut self, llm_model: impl Into<String>) -> Self {
        self.config.llm_model = llm_model.into();
        self
    }

    /// Set the content-source credential
    pub fn source_token(mut self, source_token: Option<String>) -> Self {
        self.config.source_token = source_token;
        self
    }

    /// Set the per-file size gate
    pub fn max_input_length(mut self, max_input_length: usize) -> Self {
        self.config.max_input_length = max_input_length;
        self
    }

    /// Set the request quota
    pub fn requests_per_minute(mut self, requests_per_minute: u32) -> Self {
        self.config.requests_per_minute = requests_per_minute;
        self
    }

    /// Set the artifact directory
    pub fn output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = output_dir.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> DigestConfig {
        self.config
    }
}

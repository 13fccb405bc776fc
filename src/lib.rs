//! Branch Name Generator Library
//!
//! A two-tier library for generating compact, git-safe branch names and
//! PR titles from ticket summaries. The primary tier calls an LLM provider;
//! a deterministic rule-based engine takes over when the model tier is
//! unavailable or fails.

pub mod error;
pub mod fallback;
pub mod generator;
pub mod lexicon;
pub mod prompts;
pub mod provider;
pub mod slug;

pub use error::{Error, Result};
pub use fallback::FallbackGenerator;
pub use generator::NameGenerator;
pub use provider::ProviderKind;

use std::time::Duration;

/// A work item driving name generation, as supplied by an issue-tracker
/// client. The core never mutates or persists it.
#[derive(Debug, Clone)]
pub struct TicketContext {
    /// Tracker key, e.g. "EH-1234". Preserved verbatim in the slug.
    pub id: String,
    pub summary: String,
    pub description: Option<String>,
}

impl TicketContext {
    pub fn new(id: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            summary: summary.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Structured reasoning returned by the analysis call, for display only.
#[derive(Debug, Clone)]
pub struct TicketAnalysis {
    pub primary_action: String,
    pub technical_context: Vec<String>,
    pub business_context: Vec<String>,
    pub reasoning: String,
}

/// Final output of a generation call: the slug plus the model's analysis
/// when the model tier produced it.
#[derive(Debug, Clone)]
pub struct GeneratedIdentifier {
    pub slug: String,
    pub analysis: Option<TicketAnalysis>,
}

/// Configuration for a single generation call.
///
/// Resolved once by the caller (typically a config store) and passed by
/// value; the core holds no ambient or global configuration state.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub provider: ProviderKind,
    pub api_key: String,
    /// Model identifier; `None` selects the provider's default.
    pub model: Option<String>,
    /// Required for Azure, optional endpoint override for Gemini.
    pub base_endpoint: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub summary_temperature: f32,
    pub summary_max_tokens: u32,
    /// Whether branch-name generation falls back to the deterministic
    /// engine when the model tier fails. PR titles never fall back.
    pub allow_fallback: bool,
    pub request_timeout: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::OpenAi,
            api_key: String::new(),
            model: None,
            base_endpoint: None,
            temperature: 0.3,
            max_tokens: 500,
            summary_temperature: 0.2,
            summary_max_tokens: 50,
            allow_fallback: true,
            request_timeout: Duration::from_secs(15),
        }
    }
}

impl GenerationConfig {
    pub fn with_provider(mut self, provider: ProviderKind) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_base_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.base_endpoint = Some(endpoint.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_summary_temperature(mut self, temperature: f32) -> Self {
        self.summary_temperature = temperature;
        self
    }

    pub fn with_summary_max_tokens(mut self, max_tokens: u32) -> Self {
        self.summary_max_tokens = max_tokens;
        self
    }

    pub fn with_allow_fallback(mut self, allow_fallback: bool) -> Self {
        self.allow_fallback = allow_fallback;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// The model identifier to use, falling back to the provider default.
    pub fn model_name(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }
}

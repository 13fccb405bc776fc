//! LLM provider abstraction
//!
//! A single chat-completion contract implemented by four interchangeable
//! backends. Each generation call constructs its own provider instance
//! from the supplied config; no state is shared across invocations.

mod anthropic;
mod azure;
mod gemini;
mod openai;

pub use anthropic::AnthropicProvider;
pub use azure::AzureProvider;
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

use crate::{Error, GenerationConfig, Result};
use async_trait::async_trait;
use serde::Serialize;

/// The closed set of supported backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Gemini,
    Anthropic,
    Azure,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Gemini => "gemini",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Azure => "azure",
        }
    }

    /// Model used when the config does not name one.
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "gpt-4o-mini",
            ProviderKind::Gemini => "gemini-1.5-flash",
            ProviderKind::Anthropic => "claude-3-5-haiku-latest",
            // Azure models are addressed by deployment name
            ProviderKind::Azure => "gpt-4o-mini",
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "gemini" => Ok(ProviderKind::Gemini),
            "anthropic" => Ok(ProviderKind::Anthropic),
            "azure" => Ok(ProviderKind::Azure),
            other => Err(Error::Provider {
                message: format!("Unknown provider kind '{}'", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatRequest {
    /// Minimal request used by `test_connection`.
    fn connection_probe() -> Self {
        Self {
            messages: vec![ChatMessage::user("ping")],
            temperature: 0.0,
            max_tokens: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatCompletion {
    pub content: String,
}

/// Uniform chat-completion interface over the four backends.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn create_chat_completion(&self, request: &ChatRequest) -> Result<ChatCompletion>;

    /// Issue a minimal request and report reachability without erroring.
    async fn test_connection(&self) -> bool {
        self.create_chat_completion(&ChatRequest::connection_probe())
            .await
            .is_ok()
    }
}

/// Construct the provider selected by the config.
///
/// Fails fast when the API key is missing, or when the Azure backend is
/// selected without a base endpoint.
pub fn create_provider(config: &GenerationConfig) -> Result<Box<dyn ChatProvider>> {
    if config.api_key.trim().is_empty() {
        return Err(Error::MissingApiKey {
            provider: config.provider.as_str().to_string(),
        });
    }

    Ok(match config.provider {
        ProviderKind::OpenAi => Box::new(OpenAiProvider::new(config)?),
        ProviderKind::Gemini => Box::new(GeminiProvider::new(config)?),
        ProviderKind::Anthropic => Box::new(AnthropicProvider::new(config)?),
        ProviderKind::Azure => Box::new(AzureProvider::new(config)?),
    })
}

/// Build the HTTP client every backend uses, bounded by the config's
/// request timeout so a hung provider cannot stall the caller.
pub(crate) fn build_http_client(config: &GenerationConfig) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()?)
}

/// Map a non-2xx provider response to a single coherent error.
pub(crate) fn http_status_error(provider: &str, status: reqwest::StatusCode, body: &str) -> Error {
    let message = match status.as_u16() {
        401 | 403 => format!("{}: authentication failed ({})", provider, status),
        429 => format!("{}: rate limited", provider),
        500..=599 => format!("{}: server error {} - {}", provider, status, body),
        _ => format!("{}: HTTP {} - {}", provider, status, body),
    };
    Error::Provider { message }
}

/// Reject empty completions so callers can treat them as a tier failure.
pub(crate) fn non_empty_completion(provider: &str, content: &str) -> Result<ChatCompletion> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(Error::Provider {
            message: format!("{}: empty completion content", provider),
        });
    }
    Ok(ChatCompletion {
        content: trimmed.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_round_trip() {
        for kind in [
            ProviderKind::OpenAi,
            ProviderKind::Gemini,
            ProviderKind::Anthropic,
            ProviderKind::Azure,
        ] {
            assert_eq!(kind.as_str().parse::<ProviderKind>().unwrap(), kind);
        }
        assert!("mystery".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_factory_rejects_missing_api_key() {
        let config = GenerationConfig::default();
        let result = create_provider(&config);
        assert!(matches!(result, Err(Error::MissingApiKey { .. })));
    }

    #[test]
    fn test_factory_requires_endpoint_for_azure() {
        let config = GenerationConfig::default()
            .with_provider(ProviderKind::Azure)
            .with_api_key("key");
        let result = create_provider(&config);
        assert!(matches!(result, Err(Error::MissingEndpoint { .. })));
    }

    #[test]
    fn test_factory_builds_key_only_providers() {
        for kind in [
            ProviderKind::OpenAi,
            ProviderKind::Gemini,
            ProviderKind::Anthropic,
        ] {
            let config = GenerationConfig::default()
                .with_provider(kind)
                .with_api_key("key");
            let provider = create_provider(&config).unwrap();
            assert_eq!(provider.name(), kind.as_str());
        }
    }

    #[test]
    fn test_http_status_error_buckets() {
        let status = reqwest::StatusCode::UNAUTHORIZED;
        let err = http_status_error("openai", status, "");
        assert!(err.to_string().contains("authentication failed"));

        let status = reqwest::StatusCode::INTERNAL_SERVER_ERROR;
        let err = http_status_error("openai", status, "boom");
        assert!(err.to_string().contains("server error"));
    }

    #[test]
    fn test_empty_completion_is_an_error() {
        assert!(non_empty_completion("openai", "   ").is_err());
        let completion = non_empty_completion("openai", " fix-login ").unwrap();
        assert_eq!(completion.content, "fix-login");
    }

    #[test]
    fn test_role_serialization() {
        let msg = ChatMessage::system("hello");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["role"], "system");
        assert_eq!(value["content"], "hello");
    }
}

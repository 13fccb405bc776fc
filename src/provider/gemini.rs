//! Google Gemini generateContent backend

use super::{
    build_http_client, http_status_error, non_empty_completion, ChatCompletion, ChatProvider,
    ChatRequest, Role,
};
use crate::{GenerationConfig, Result};
use async_trait::async_trait;
use serde::Deserialize;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        let base_url = config
            .base_endpoint
            .as_deref()
            .filter(|endpoint| !endpoint.trim().is_empty())
            .unwrap_or(GEMINI_API_BASE)
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            api_key: config.api_key.clone(),
            model: config.model_name().to_string(),
            base_url,
            client: build_http_client(config)?,
        })
    }

    fn request_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    /// Gemini separates the system instruction and uses "model" for the
    /// assistant role.
    fn build_request_body(&self, request: &ChatRequest) -> serde_json::Value {
        let system: Vec<&str> = request
            .messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect();

        let contents: Vec<serde_json::Value> = request
            .messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| {
                serde_json::json!({
                    "role": if m.role == Role::Assistant { "model" } else { "user" },
                    "parts": [{ "text": m.content }],
                })
            })
            .collect();

        let mut body = serde_json::json!({
            "contents": contents,
            "generationConfig": {
                "temperature": request.temperature,
                "maxOutputTokens": request.max_tokens,
            },
        });
        if !system.is_empty() {
            body["systemInstruction"] = serde_json::json!({
                "parts": [{ "text": system.join("\n\n") }],
            });
        }
        body
    }
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl ChatProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn create_chat_completion(&self, request: &ChatRequest) -> Result<ChatCompletion> {
        let response = self
            .client
            .post(self.request_url())
            .json(&self.build_request_body(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(http_status_error(self.name(), status, &body));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let content = parsed
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.as_str())
            .unwrap_or_default();

        non_empty_completion(self.name(), content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ChatMessage;

    #[test]
    fn test_default_and_override_endpoint() {
        let config = GenerationConfig::default()
            .with_provider(crate::ProviderKind::Gemini)
            .with_api_key("key");
        let provider = GeminiProvider::new(&config).unwrap();
        assert!(provider.request_url().starts_with(GEMINI_API_BASE));

        let config = config.with_base_endpoint("https://proxy.example.com/gemini/");
        let provider = GeminiProvider::new(&config).unwrap();
        assert!(provider
            .request_url()
            .starts_with("https://proxy.example.com/gemini/models/"));
    }

    #[test]
    fn test_request_body_shape() {
        let config = GenerationConfig::default()
            .with_provider(crate::ProviderKind::Gemini)
            .with_api_key("key");
        let provider = GeminiProvider::new(&config).unwrap();

        let request = ChatRequest {
            messages: vec![
                ChatMessage::system("you are an expert"),
                ChatMessage::user("name this branch"),
            ],
            temperature: 0.2,
            max_tokens: 50,
        };
        let body = provider.build_request_body(&request);

        assert_eq!(body["generationConfig"]["maxOutputTokens"], 50);
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(
            body["systemInstruction"]["parts"][0]["text"],
            "you are an expert"
        );
    }

    #[test]
    fn test_generate_content_response_parsing() {
        let json =
            r#"{"candidates":[{"content":{"parts":[{"text":"fix-login-bug"}],"role":"model"}}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.candidates[0].content.parts[0].text, "fix-login-bug");
    }
}

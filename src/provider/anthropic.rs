//! Anthropic messages backend

use super::{
    build_http_client, http_status_error, non_empty_completion, ChatCompletion, ChatProvider,
    ChatRequest, Role,
};
use crate::{GenerationConfig, Result};
use async_trait::async_trait;
use serde::Deserialize;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl AnthropicProvider {
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        Ok(Self {
            api_key: config.api_key.clone(),
            model: config.model_name().to_string(),
            client: build_http_client(config)?,
        })
    }

    /// The messages API takes the system prompt as a top-level field, not
    /// as a message role.
    fn build_request_body(&self, request: &ChatRequest) -> serde_json::Value {
        let system: Vec<&str> = request
            .messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect();

        let messages: Vec<serde_json::Value> = request
            .messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| {
                serde_json::json!({
                    "role": if m.role == Role::Assistant { "assistant" } else { "user" },
                    "content": m.content,
                })
            })
            .collect();

        let mut body = serde_json::json!({
            "model": self.model,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
            "messages": messages,
        });
        if !system.is_empty() {
            body["system"] = serde_json::json!(system.join("\n\n"));
        }
        body
    }
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl ChatProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn create_chat_completion(&self, request: &ChatRequest) -> Result<ChatCompletion> {
        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&self.build_request_body(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(http_status_error(self.name(), status, &body));
        }

        let parsed: MessagesResponse = response.json().await?;
        let content = parsed
            .content
            .first()
            .map(|block| block.text.as_str())
            .unwrap_or_default();

        non_empty_completion(self.name(), content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ChatMessage;

    #[test]
    fn test_system_prompt_is_hoisted() {
        let config = GenerationConfig::default().with_api_key("key");
        let provider = AnthropicProvider::new(&config).unwrap();

        let request = ChatRequest {
            messages: vec![
                ChatMessage::system("you are an expert"),
                ChatMessage::user("name this branch"),
            ],
            temperature: 0.3,
            max_tokens: 500,
        };
        let body = provider.build_request_body(&request);

        assert_eq!(body["system"], "you are an expert");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
    }

    #[test]
    fn test_default_model() {
        let config = GenerationConfig::default()
            .with_provider(crate::ProviderKind::Anthropic)
            .with_api_key("key");
        let provider = AnthropicProvider::new(&config).unwrap();
        assert_eq!(provider.model, "claude-3-5-haiku-latest");
    }

    #[test]
    fn test_messages_response_parsing() {
        let json = r#"{"content":[{"type":"text","text":"fix-login-bug"}]}"#;
        let parsed: MessagesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.content[0].text, "fix-login-bug");
    }
}

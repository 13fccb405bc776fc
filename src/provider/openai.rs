//! OpenAI chat-completions backend

use super::{
    build_http_client, http_status_error, non_empty_completion, ChatCompletion, ChatProvider,
    ChatRequest,
};
use crate::{GenerationConfig, Result};
use async_trait::async_trait;
use serde::Deserialize;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

pub struct OpenAiProvider {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        Ok(Self {
            api_key: config.api_key.clone(),
            model: config.model_name().to_string(),
            client: build_http_client(config)?,
        })
    }

    fn build_request_body(&self, request: &ChatRequest) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": request.messages,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        })
    }
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn create_chat_completion(&self, request: &ChatRequest) -> Result<ChatCompletion> {
        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(&self.api_key)
            .json(&self.build_request_body(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(http_status_error(self.name(), status, &body));
        }

        let parsed: CompletionResponse = response.json().await?;
        let content = parsed
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .unwrap_or_default();

        non_empty_completion(self.name(), content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ChatMessage;

    #[test]
    fn test_request_body_shape() {
        let config = GenerationConfig::default().with_api_key("key");
        let provider = OpenAiProvider::new(&config).unwrap();

        let request = ChatRequest {
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("hello")],
            temperature: 0.2,
            max_tokens: 50,
        };
        let body = provider.build_request_body(&request);

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["max_tokens"], 50);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hello");
    }

    #[test]
    fn test_model_override() {
        let config = GenerationConfig::default()
            .with_api_key("key")
            .with_model("gpt-4o");
        let provider = OpenAiProvider::new(&config).unwrap();
        assert_eq!(provider.model, "gpt-4o");
    }

    #[test]
    fn test_completion_response_parsing() {
        let json = r#"{"choices":[{"message":{"role":"assistant","content":"fix-login-bug"}}]}"#;
        let parsed: CompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("fix-login-bug")
        );
    }
}

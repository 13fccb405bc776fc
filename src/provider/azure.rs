//! Azure OpenAI deployments backend
//!
//! Request and response bodies match the OpenAI chat-completions shape,
//! but the URL addresses a named deployment on a caller-supplied resource
//! endpoint, which is therefore mandatory.

use super::{
    build_http_client, http_status_error, non_empty_completion, ChatCompletion, ChatProvider,
    ChatRequest,
};
use crate::{Error, GenerationConfig, Result};
use async_trait::async_trait;
use serde::Deserialize;

const AZURE_API_VERSION: &str = "2024-02-15-preview";

pub struct AzureProvider {
    api_key: String,
    deployment: String,
    endpoint: String,
    client: reqwest::Client,
}

impl AzureProvider {
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        let endpoint = config
            .base_endpoint
            .as_deref()
            .map(str::trim)
            .filter(|endpoint| !endpoint.is_empty())
            .ok_or_else(|| Error::MissingEndpoint {
                provider: "azure".to_string(),
            })?;

        Ok(Self {
            api_key: config.api_key.clone(),
            deployment: config.model_name().to_string(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client: build_http_client(config)?,
        })
    }

    fn request_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.deployment, AZURE_API_VERSION
        )
    }

    fn build_request_body(&self, request: &ChatRequest) -> serde_json::Value {
        serde_json::json!({
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
impl ChatProvider for AzureProvider {
    fn name(&self) -> &'static str {
        "azure"
    }

    async fn create_chat_completion(&self, request: &ChatRequest) -> Result<ChatCompletion> {
        let response = self
            .client
            .post(self.request_url())
            .header("api-key", &self.api_key)
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

//! Azure OpenAI Provider
//!
//! Implementation of the `EndpointProvider` trait for Azure OpenAI chat
//! deployments. Speaks the standard chat-completion contract: an ordered
//! role/content message array in, a single text choice out.

use async_trait::async_trait;
use serde::Deserialize;

use crate::http_client::build_http_client;
use crate::provider::{parse_http_error, EndpointProvider};
use crate::types::{LlmError, LlmResult, Message, ModelSettings};

/// Azure OpenAI chat-completion provider.
pub struct AzureOpenAiProvider {
    settings: ModelSettings,
    client: reqwest::Client,
}

impl AzureOpenAiProvider {
    /// Create a new provider with the given resolved settings.
    pub fn new(settings: ModelSettings) -> Self {
        let client = build_http_client();
        Self { settings, client }
    }

    /// Build the deployment-scoped request URL.
    ///
    /// Azure routes by deployment name rather than by a `model` body field:
    /// `{endpoint}/openai/deployments/{deployment}/chat/completions?api-version={v}`
    fn request_url(&self) -> String {
        let endpoint = self.settings.endpoint.trim_end_matches('/');
        let api_version = self.settings.api_version.as_deref().unwrap_or_default();
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            endpoint, self.settings.deployment, api_version
        )
    }

    /// Build the request body for the API.
    fn build_request_body(&self, conversation: &[Message]) -> serde_json::Value {
        let messages: Vec<serde_json::Value> = conversation
            .iter()
            .map(|msg| {
                serde_json::json!({
                    "role": msg.role.as_str(),
                    "content": msg.content,
                })
            })
            .collect();

        let mut body = serde_json::json!({ "messages": messages });

        // Reasoning deployments reject an explicit temperature; the registry
        // only sets one for models that accept it.
        if let Some(temperature) = self.settings.temperature {
            body["temperature"] = serde_json::json!(temperature);
        }

        body
    }

    /// Extract the single text choice from a parsed response.
    fn parse_response(&self, response: ChatCompletionResponse) -> LlmResult<String> {
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                LlmError::invalid_response(format!(
                    "{}: response contained no message content",
                    self.settings.model
                ))
            })
    }
}

#[async_trait]
impl EndpointProvider for AzureOpenAiProvider {
    fn name(&self) -> &'static str {
        "azure-openai"
    }

    fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    async fn complete(&self, conversation: &[Message]) -> LlmResult<String> {
        let api_key = self.settings.api_key.as_deref().ok_or_else(|| {
            LlmError::configuration(format!(
                "Missing API key for model: {}",
                self.settings.model
            ))
        })?;

        let body = self.build_request_body(conversation);

        tracing::debug!(
            model = %self.settings.model,
            deployment = %self.settings.deployment,
            turns = conversation.len(),
            "sending chat completion request"
        );

        let response = self
            .client
            .post(self.request_url())
            .header("api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body = response.text().await.unwrap_or_default();
            return Err(parse_http_error(status, &body, self.name()));
        }

        let parsed: ChatCompletionResponse = response.json().await?;
        self.parse_response(parsed)
    }
}

/// Chat-completion response (the subset this gateway reads).
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

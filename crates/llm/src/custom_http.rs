//! Custom HTTP Provider
//!
//! Implementation of the `EndpointProvider` trait for non-standard hosted
//! endpoints (the MedGEMMA deployment). Sends a bare `{"messages": [...]}` POST
//! and normalizes whichever of the known response shapes comes back.

use async_trait::async_trait;

use crate::http_client::build_http_client;
use crate::provider::{parse_http_error, EndpointProvider};
use crate::types::{LlmResult, Message, ModelSettings};

/// Provider for bare-JSON model endpoints.
pub struct CustomHttpProvider {
    settings: ModelSettings,
    client: reqwest::Client,
}

impl CustomHttpProvider {
    /// Create a new provider with the given resolved settings.
    pub fn new(settings: ModelSettings) -> Self {
        let client = build_http_client();
        Self { settings, client }
    }

    /// Normalize the loosely-shaped response body to plain text.
    ///
    /// Accepted shapes, in order:
    /// 1. OpenAI-shaped `choices[0].message.content`
    /// 2. a top-level `output` string
    /// 3. fallback: the entire JSON body stringified
    fn extract_text(body: &serde_json::Value) -> String {
        if let Some(content) = body
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
        {
            return content.to_string();
        }

        if let Some(output) = body.get("output").and_then(|v| v.as_str()) {
            return output.to_string();
        }

        body.to_string()
    }
}

#[async_trait]
impl EndpointProvider for CustomHttpProvider {
    fn name(&self) -> &'static str {
        "custom-http"
    }

    fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    async fn complete(&self, conversation: &[Message]) -> LlmResult<String> {
        let messages: Vec<serde_json::Value> = conversation
            .iter()
            .map(|msg| {
                serde_json::json!({
                    "role": msg.role.as_str(),
                    "content": msg.content,
                })
            })
            .collect();
        let body = serde_json::json!({ "messages": messages });

        tracing::debug!(
            model = %self.settings.model,
            endpoint = %self.settings.endpoint,
            turns = conversation.len(),
            "sending bare-json request"
        );

        let mut request = self.client.post(&self.settings.endpoint).json(&body);
        if let Some(api_key) = &self.settings.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body = response.text().await.unwrap_or_default();
            return Err(parse_http_error(status, &body, self.name()));
        }

        let parsed: serde_json::Value = response.json().await?;
        Ok(Self::extract_text(&parsed))
    }
}

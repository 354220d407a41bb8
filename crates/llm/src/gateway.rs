//! Model Gateway
//!
//! The uniform call surface over all hosted endpoints: resolves the selected
//! model's settings, picks the matching provider, and returns plain text.
//! No local state is retained between calls.

use async_trait::async_trait;

use crate::azure_openai::AzureOpenAiProvider;
use crate::custom_http::CustomHttpProvider;
use crate::provider::{EndpointProvider, TextCompletion};
use crate::registry::resolve_settings;
use crate::types::{EndpointProtocol, LlmResult, Message};

/// Gateway dispatching conversations to hosted model endpoints.
#[derive(Debug, Default, Clone, Copy)]
pub struct ModelGateway;

impl ModelGateway {
    pub fn new() -> Self {
        Self
    }

    /// Build the provider for a model from its resolved settings.
    fn provider_for(&self, model: &str) -> LlmResult<Box<dyn EndpointProvider>> {
        let settings = resolve_settings(model)?;
        Ok(match settings.protocol {
            EndpointProtocol::AzureChatCompletions => {
                Box::new(AzureOpenAiProvider::new(settings))
            }
            EndpointProtocol::CustomHttp => Box::new(CustomHttpProvider::new(settings)),
        })
    }
}

#[async_trait]
impl TextCompletion for ModelGateway {
    async fn invoke(&self, conversation: &[Message], model: &str) -> LlmResult<String> {
        let provider = self.provider_for(model)?;
        tracing::info!(model, provider = provider.name(), "invoking model");
        provider.complete(conversation).await
    }
}

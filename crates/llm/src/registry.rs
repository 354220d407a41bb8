//! Model Registry
//!
//! Maps each supported model name to its connection settings (endpoint,
//! credential, protocol version), resolved from process environment. Missing
//! values fail fast with a descriptive configuration error rather than a
//! silent default.

use crate::types::{EndpointProtocol, LlmError, LlmResult, ModelSettings};

/// Models the gateway knows how to reach.
pub const SUPPORTED_MODELS: &[&str] = &[
    "gpt-4.1",
    "gpt-4.1-mini",
    "gpt-4.1-nano",
    "gpt-5",
    "gpt-5-mini",
    "gpt-5-nano",
    "medgemma-27b-multimodal7",
];

/// Temperature sent to models that accept an explicit value.
const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Resolve connection settings for a model from process environment.
pub fn resolve_settings(model: &str) -> LlmResult<ModelSettings> {
    resolve_settings_with(model, |name| std::env::var(name).ok())
}

/// Resolve settings through an injectable environment lookup (testable seam).
pub fn resolve_settings_with<F>(model: &str, lookup: F) -> LlmResult<ModelSettings>
where
    F: Fn(&str) -> Option<String>,
{
    // (key env, endpoint env, api version, temperature)
    let (key_env, endpoint_env, api_version, temperature) = match model {
        // The gpt-4.1 family shares one deployment resource and accepts an
        // explicit temperature; the gpt-5 family rejects one.
        "gpt-4.1" | "gpt-4.1-mini" | "gpt-4.1-nano" => (
            "AZURE_OPENAI_API_KEY",
            "AZURE_OPENAI_ENDPOINT",
            "2024-12-01-preview",
            Some(DEFAULT_TEMPERATURE),
        ),
        "gpt-5" => (
            "AZURE_OPENAI_API_KEY_GPT_5",
            "AZURE_OPENAI_ENDPOINT_GPT_5",
            "2025-01-01-preview",
            None,
        ),
        "gpt-5-mini" => (
            "AZURE_OPENAI_API_KEY_GPT_5_MINI",
            "AZURE_OPENAI_ENDPOINT_GPT_5_MINI",
            "2025-04-01-preview",
            None,
        ),
        "gpt-5-nano" => (
            "AZURE_OPENAI_API_KEY_GPT_5_NANO",
            "AZURE_OPENAI_ENDPOINT_GPT_5_NANO",
            "2025-01-01-preview",
            None,
        ),
        "medgemma-27b-multimodal7" => {
            let endpoint = require(&lookup, "MEDGEMMA_ENDPOINT", model)?;
            return Ok(ModelSettings {
                model: model.to_string(),
                deployment: model.to_string(),
                endpoint,
                // Bearer auth only when the deployment is key-protected.
                api_key: lookup("MEDGEMMA_API_KEY").filter(|v| !v.trim().is_empty()),
                api_version: None,
                protocol: EndpointProtocol::CustomHttp,
                temperature: None,
            });
        }
        other => {
            return Err(LlmError::configuration(format!(
                "Unknown model: {}",
                other
            )));
        }
    };

    let api_key = require(&lookup, key_env, model)?;
    let endpoint = require(&lookup, endpoint_env, model)?;

    Ok(ModelSettings {
        model: model.to_string(),
        deployment: model.to_string(),
        endpoint,
        api_key: Some(api_key),
        api_version: Some(api_version.to_string()),
        protocol: EndpointProtocol::AzureChatCompletions,
        temperature,
    })
}

/// Look up a required environment value, treating blank as absent.
fn require<F>(lookup: &F, name: &str, model: &str) -> LlmResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| {
            LlmError::configuration(format!(
                "Missing {} for model: {}",
                name, model
            ))
        })
}

//! Gateway Types
//!
//! Conversation message types, per-model connection settings, and the error
//! type shared by all providers.

use serde::{Deserialize, Serialize};

/// Role of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    /// Wire name used in chat-completion request bodies.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// A single conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Wire protocol spoken by a model endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointProtocol {
    /// Azure OpenAI deployment speaking the standard chat-completion contract.
    AzureChatCompletions,
    /// Bare `{"messages": [...]}` POST endpoint with a loosely-shaped response.
    CustomHttp,
}

/// Resolved connection settings for one model.
///
/// Produced by the registry from process environment; a settings struct always
/// carries usable values — missing environment fails at resolution time.
#[derive(Debug, Clone)]
pub struct ModelSettings {
    /// Model name as selected by the user (registry key).
    pub model: String,
    /// Deployment name sent to the endpoint.
    pub deployment: String,
    /// Endpoint base URL.
    pub endpoint: String,
    /// API key. Optional only for the custom HTTP protocol.
    pub api_key: Option<String>,
    /// API version query parameter (Azure only).
    pub api_version: Option<String>,
    pub protocol: EndpointProtocol,
    /// Sampling temperature, sent only when the model supports it.
    pub temperature: Option<f64>,
}

/// Errors produced by the model gateway.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Missing or invalid connection settings for the selected model.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Credential rejected by the endpoint.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// Endpoint rate limit hit.
    #[error("Rate limited: {message}")]
    RateLimited { message: String },

    /// Endpoint-side failure (5xx).
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Any other non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Transport-level failure (DNS, TLS, timeout).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body did not match the expected shape.
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },
}

impl LlmError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an invalid-response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }
}

/// Result type alias for gateway operations.
pub type LlmResult<T> = Result<T, LlmError>;

//! Provider Trait
//!
//! Defines the common interface implemented by every hosted-endpoint provider,
//! plus shared HTTP error mapping.

use async_trait::async_trait;

use crate::types::{LlmError, LlmResult, Message, ModelSettings};

/// Trait implemented by each endpoint provider.
///
/// A provider owns the wire format for one protocol: it serializes the
/// conversation, performs the HTTP call, and normalizes the response to plain
/// text. Providers hold no state between calls beyond the HTTP client.
#[async_trait]
pub trait EndpointProvider: Send + Sync {
    /// Provider name for identification and logging.
    fn name(&self) -> &'static str;

    /// The resolved settings this provider was built with.
    fn settings(&self) -> &ModelSettings;

    /// Send an ordered conversation and return the model's text reply.
    async fn complete(&self, conversation: &[Message]) -> LlmResult<String>;
}

/// The uniform call interface the rest of the application programs against.
///
/// `ModelGateway` implements this for real endpoints; tests substitute a mock.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    /// Invoke the named model with an ordered conversation, returning plain text.
    async fn invoke(&self, conversation: &[Message], model: &str) -> LlmResult<String>;
}

/// Map a non-success HTTP status to a typed gateway error.
pub fn parse_http_error(status: u16, body: &str, provider: &str) -> LlmError {
    match status {
        401 | 403 => LlmError::AuthenticationFailed {
            message: format!("{}: {}", provider, body),
        },
        429 => LlmError::RateLimited {
            message: format!("{}: {}", provider, body),
        },
        500..=599 => LlmError::ServerError {
            status,
            message: format!("{}: {}", provider, body),
        },
        _ => LlmError::Http {
            status,
            message: format!("{}: {}", provider, body),
        },
    }
}

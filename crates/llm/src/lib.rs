//! CCV Research LLM
//!
//! Provides a uniform call interface over the hosted text-generation endpoints
//! used by CCV Research:
//! - Azure OpenAI chat deployments (gpt-4.1 and gpt-5 families)
//! - The MedGEMMA bare-JSON HTTP endpoint
//!
//! Per-model connection settings come from process environment via the
//! registry; absent settings fail fast with a configuration error. The gateway
//! performs network I/O only and keeps no state between calls.

pub mod azure_openai;
pub mod custom_http;
pub mod gateway;
pub mod http_client;
pub mod provider;
pub mod registry;
pub mod types;

// Re-export main types
pub use azure_openai::AzureOpenAiProvider;
pub use custom_http::CustomHttpProvider;
pub use gateway::ModelGateway;
pub use http_client::build_http_client;
pub use provider::{EndpointProvider, TextCompletion};
pub use registry::{resolve_settings, SUPPORTED_MODELS};
pub use types::{
    EndpointProtocol, LlmError, LlmResult, Message, MessageRole, ModelSettings,
};

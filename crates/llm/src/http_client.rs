//! HTTP Client Factory
//!
//! Provides a factory function for building reqwest clients with the timeout
//! shared by all providers.

use std::time::Duration;

/// Request timeout for model endpoints. Research prompts can take minutes on
/// reasoning models.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Build a `reqwest::Client` configured for model-endpoint calls.
pub fn build_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .expect("failed to build reqwest client")
}

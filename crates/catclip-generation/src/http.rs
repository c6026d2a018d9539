//! Shared HTTP plumbing for vendor clients.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::error::{GenerationError, GenerationResult};

/// Build an HTTP client with the given per-request timeout.
pub(crate) fn build_client(timeout: Duration) -> GenerationResult<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(GenerationError::Network)
}

/// Fail on a non-success status, otherwise decode the body as `T`.
pub(crate) async fn read_json<T: DeserializeOwned>(
    provider: &'static str,
    response: Response,
) -> GenerationResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(GenerationError::Api {
            provider,
            status: status.as_u16(),
            body,
        });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        GenerationError::invalid_response(format!("failed to decode {} response: {}", provider, e))
    })
}

/// Join a base URL and a path without doubling slashes.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

//! HTTP response helpers for backend calls.

use reqwest::Response;
use serde::de::DeserializeOwned;

use crate::models::ApiErrorBody;
use crate::{Error, Result};

/// Turn a backend response into `T`, or an API error.
///
/// Non-2xx responses use the body's `error` field as the message when present,
/// otherwise `fallback`.
pub async fn read_json<T: DeserializeOwned>(response: Response, fallback: &str) -> Result<T> {
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        return Err(api_error(status.as_u16(), &body, fallback));
    }

    serde_json::from_slice(&body).map_err(|e| Error::Decode(e.to_string()))
}

/// Like `read_json`, but only checks the status and discards the body.
pub async fn expect_success(response: Response, fallback: &str) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let body = response.bytes().await.unwrap_or_default();
    Err(api_error(status.as_u16(), &body, fallback))
}

/// Build an API error from a raw error body.
pub fn api_error(status: u16, body: &[u8], fallback: &str) -> Error {
    let message = serde_json::from_slice::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string());

    Error::Api { status, message }
}

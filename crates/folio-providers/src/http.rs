use anyhow::Context;
use folio_core::feed::FeedError;
use reqwest::header::HeaderMap;
use reqwest::{RequestBuilder, Response};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

/// Sends the request exactly once. A non-success status becomes
/// [`FeedError::EndpointUnavailable`]; failing to get a response at all
/// becomes [`FeedError::TransportFailure`].
pub async fn send_once(builder: RequestBuilder) -> Result<Response, FeedError> {
    let response = builder
        .send()
        .await
        .context("send request")
        .map_err(FeedError::transport)?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if let Some(wait) = rate_limit_wait(response.headers()) {
        warn!(
            status = status.as_u16(),
            wait_secs = wait,
            "Listing endpoint is rate limiting this client"
        );
    }
    Err(FeedError::EndpointUnavailable {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or_default().to_string(),
    })
}

/// Seconds until the endpoint accepts requests again, when it says so.
pub(crate) fn rate_limit_wait(headers: &HeaderMap) -> Option<u64> {
    retry_after_seconds(headers).or_else(|| ratelimit_reset_seconds(headers))
}

fn retry_after_seconds(headers: &HeaderMap) -> Option<u64> {
    headers
        .get("retry-after")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok())
}

fn ratelimit_reset_seconds(headers: &HeaderMap) -> Option<u64> {
    let remaining = headers
        .get("x-ratelimit-remaining")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok());
    if remaining.is_some_and(|value| value > 0) {
        return None;
    }
    let reset = headers
        .get("x-ratelimit-reset")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok())?;
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    if reset <= now {
        None
    } else {
        Some(reset - now)
    }
}

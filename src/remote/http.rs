//! Shared HTTP plumbing: client construction, headers, status mapping.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::CourierError;

/// Build a reqwest client for one collaborator. Each client owns its pool.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, CourierError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(10)
        .build()
        .map_err(CourierError::Network)
}

/// Headers for the Assistants v2 API.
pub fn assistants_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert("openai-beta", HeaderValue::from_static("assistants=v2"));
    if let Ok(val) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

/// Map a non-success HTTP status to an error.
pub fn status_to_error(status: u16, body: &str) -> CourierError {
    match status {
        401 | 403 => CourierError::Authentication(body.to_string()),
        429 => CourierError::RateLimited {
            retry_after_ms: extract_retry_after(body),
        },
        _ => CourierError::api(status, body),
    }
}

fn extract_retry_after(body: &str) -> Option<u64> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("retry_after"))
                .and_then(|r| r.as_f64())
                .map(|s| (s * 1000.0) as u64)
        })
}

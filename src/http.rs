//! Shared HTTP plumbing for the provider clients
//!
//! Every provider gets its own client with its own timeout, wrapped in a
//! transient-retry middleware. Responses are checked and failures classified
//! into [`ErrorCode`]s here so the clients only deal with payloads.

use std::collections::HashMap;
use std::time::Instant;

use anyhow::{Context, Result};
use reqwest::{Response, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use tracing::{debug, warn};

use crate::config::ProviderConfig;
use crate::{ErrorCode, TourismError};

/// Responses slower than this are logged as warnings
const SLOW_RESPONSE_SECS: u64 = 5;

/// Build a client honoring the provider's timeout and retry settings
pub fn build_client(provider: &ProviderConfig, user_agent: &str) -> Result<ClientWithMiddleware> {
    let client = reqwest::Client::builder()
        .timeout(provider.timeout())
        .user_agent(user_agent)
        .build()
        .with_context(|| "Failed to create HTTP client")?;

    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(provider.max_retries);

    Ok(ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}

/// Send a request and turn transport errors and non-success statuses into `TourismError`s
pub async fn send_checked(
    provider: &'static str,
    request: RequestBuilder,
    context: HashMap<String, String>,
) -> Result<Response> {
    let start = Instant::now();

    let response = request.send().await.map_err(|e| {
        let code = classify_transport(&e);
        warn!("{} request failed ({}): {}", provider, code, e);
        TourismError::api_with_context(
            format!("{provider} request failed: {e}"),
            code,
            context.clone(),
        )
    })?;

    let elapsed = start.elapsed();
    let status = response.status();
    debug!(
        "{} responded {} in {:.3}s",
        provider,
        status,
        elapsed.as_secs_f64()
    );

    if elapsed.as_secs() > SLOW_RESPONSE_SECS {
        warn!(
            "Slow {} response detected: {:.3}s",
            provider,
            elapsed.as_secs_f64()
        );
    }

    if !status.is_success() {
        let code = classify_status(status);
        let mut context = context;
        context.insert("status_code".to_string(), status.as_u16().to_string());
        return Err(TourismError::api_with_context(
            format!(
                "{provider} request failed with status: {} - {}",
                status,
                status.canonical_reason().unwrap_or("Unknown error")
            ),
            code,
            context,
        )
        .into());
    }

    Ok(response)
}

/// Map a non-success status to an error code
#[must_use]
pub fn classify_status(status: StatusCode) -> ErrorCode {
    match status.as_u16() {
        404 => ErrorCode::ApiLocationNotFound,
        408 | 504 => ErrorCode::ApiTimeout,
        429 => ErrorCode::ApiRateLimit,
        500..=599 => ErrorCode::ApiServerError,
        _ => ErrorCode::ApiNetworkError,
    }
}

fn classify_transport(error: &reqwest_middleware::Error) -> ErrorCode {
    match error {
        reqwest_middleware::Error::Reqwest(e) if e.is_timeout() => ErrorCode::ApiTimeout,
        reqwest_middleware::Error::Reqwest(e) if e.is_decode() => ErrorCode::ApiInvalidResponse,
        _ => ErrorCode::ApiNetworkError,
    }
}

/// Trim a trailing slash so paths can be appended with `format!`
#[must_use]
pub fn join_url(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

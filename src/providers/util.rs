use crate::core::error::FetchError;
use reqwest::StatusCode;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

pub const USER_AGENT: &str = concat!("dolarwatch/", env!("CARGO_PKG_VERSION"));

/// How many times a request is attempted and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total runs, including the first one.
    pub max_attempts: usize,
    /// Delay after the first failure; doubled after each further failure.
    pub initial_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, initial_backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_backoff,
        }
    }

    /// A single attempt.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Delay to wait after the given failed attempt (1-based).
    pub fn backoff(&self, attempt: usize) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16) as u32;
        self.initial_backoff.saturating_mul(1u32 << exponent)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

/// Retries an async operation while it fails with a transient error.
///
/// # Parameters
/// - `provider`: Name used in log messages
/// - `policy`: Attempt count and backoff
/// - `operation`: Closure returning a future
///
/// # Returns
/// Either the successful result, the first permanent error, or the last
/// transient error once all attempts are used
pub async fn with_retry<F, Fut, T>(
    provider: &str,
    policy: RetryPolicy,
    mut operation: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(err) if err.is_transient() && attempt < policy.max_attempts => {
                let delay = policy.backoff(attempt);
                warn!(
                    provider,
                    "Attempt {}/{} failed: {}. Retrying in {:?}...",
                    attempt,
                    policy.max_attempts,
                    err,
                    delay
                );
                attempt += 1;
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Server-side hiccups worth retrying.
pub fn is_transient_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT
    )
}

/// Maps a reqwest failure onto the fetch error taxonomy. Anything that happened
/// on the wire (timeouts, refused connections, broken bodies) is transient.
pub fn classify_request_error(provider: &str, err: reqwest::Error) -> FetchError {
    if err.is_builder() {
        FetchError::permanent(provider, format!("Invalid request: {err}"))
    } else if err.is_timeout() {
        FetchError::transient(provider, format!("Request timed out: {err}"))
    } else {
        FetchError::transient(provider, format!("Request error: {err}"))
    }
}

/// Issues a GET and returns the body of a successful response.
pub async fn get_text(
    client: &reqwest::Client,
    provider: &str,
    url: &str,
) -> Result<String, FetchError> {
    debug!("Requesting quotes from {}", url);
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| classify_request_error(provider, e))?;

    let status = response.status();
    if !status.is_success() {
        let message = format!("HTTP error: {status} for URL: {url}");
        return Err(if is_transient_status(status) {
            FetchError::transient(provider, message)
        } else {
            FetchError::permanent(provider, message)
        });
    }

    response
        .text()
        .await
        .map_err(|e| classify_request_error(provider, e))
}

pub fn build_client(timeout: Duration) -> anyhow::Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?)
}

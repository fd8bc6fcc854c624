//! Retry logic with exponential backoff for HTTP generation calls.
//!
//! Retries on transient errors (429 rate limit, 5xx server errors, network
//! failures). Does NOT retry on client errors (400, 401, 403, 404).

use crate::error::GenerationError;
use reqwest::{Response, StatusCode};
use std::time::Duration;

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Initial delay before the first retry.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Multiplier for each subsequent delay.
    pub backoff_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff_factor: 2.0,
        }
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
        || status.is_server_error()
}

/// Execute an HTTP operation until it succeeds, fails permanently, or
/// `max_attempts` is exhausted. The last failure is returned as-is.
pub async fn with_retry<F, Fut>(
    config: &RetryConfig,
    provider_name: &str,
    operation: F,
) -> Result<Response, GenerationError>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = reqwest::Result<Response>>,
{
    let mut delay = config.initial_delay;
    let mut last_error = GenerationError::NotConfigured(format!(
        "{} retry policy allows no attempts",
        provider_name
    ));

    for attempt in 1..=config.max_attempts {
        match operation().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    if attempt > 1 {
                        tracing::info!("{} succeeded on attempt {}", provider_name, attempt);
                    }
                    return Ok(response);
                }

                let body = response.text().await.unwrap_or_default();
                let error = GenerationError::Status {
                    provider: provider_name.to_string(),
                    status: status.as_u16(),
                    body: body.chars().take(500).collect(),
                };
                if !is_retryable_status(status) {
                    return Err(error);
                }
                tracing::warn!(
                    "{} returned {} on attempt {}/{}",
                    provider_name,
                    status,
                    attempt,
                    config.max_attempts
                );
                last_error = error;
            }
            Err(e) => {
                tracing::warn!(
                    "{} network error on attempt {}/{}: {}",
                    provider_name,
                    attempt,
                    config.max_attempts,
                    e
                );
                last_error = GenerationError::Request {
                    provider: provider_name.to_string(),
                    message: e.to_string(),
                };
            }
        }

        if attempt < config.max_attempts {
            let sleep_time = delay + Duration::from_millis(rand_jitter());
            tracing::info!(
                "{} retrying in {:.1}s (attempt {}/{})",
                provider_name,
                sleep_time.as_secs_f64(),
                attempt + 1,
                config.max_attempts
            );
            tokio::time::sleep(sleep_time).await;
            delay = Duration::from_secs_f64(
                (delay.as_secs_f64() * config.backoff_factor).min(config.max_delay.as_secs_f64()),
            );
        }
    }

    Err(last_error)
}

/// Random-ish 0-500ms taken from the clock's sub-second nanos.
fn rand_jitter() -> u64 {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();
    (nanos % 500) as u64
}

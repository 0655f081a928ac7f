use coursedigest_llm::LlmError;
use rand::Rng;
use std::future::Future;
use std::time::Duration;

use crate::error::SummarizeError;

/// Exponential backoff with jitter for rate-limited LLM calls
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Wait before the second attempt; doubles for every later attempt
    pub base_delay: Duration,
    /// Upper bound of the uniform random delay added to every wait
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
            max_jitter: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, max_jitter: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            max_jitter,
        }
    }

    /// No waiting between attempts
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO, Duration::ZERO)
    }

    /// Deterministic part of the wait after failed attempt `retry` (0-based)
    pub fn backoff(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(1u32 << retry.min(16))
    }

    fn delay_for(&self, retry: u32, error: &LlmError) -> Duration {
        let jitter_ms = self.max_jitter.as_millis() as u64;
        let jitter = if jitter_ms == 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(rand::thread_rng().gen_range(0..=jitter_ms))
        };

        let delay = self.backoff(retry) + jitter;
        match error {
            LlmError::RateLimited { retry_after: Some(hint), .. } => delay.max(*hint),
            _ => delay,
        }
    }
}

/// Run `f` until it succeeds, fails with a non-retryable error, or the policy's
/// attempt budget is spent.
pub async fn with_retry<F, Fut, T>(policy: &RetryPolicy, label: &str, mut f: F) -> Result<T, SummarizeError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, LlmError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match f().await {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_retryable() => {
                tracing::warn!(label = label, attempt = attempt, error = %e, "LLM request failed, not retrying");
                return Err(SummarizeError::Fatal(e));
            }
            Err(e) => {
                if attempt >= max_attempts {
                    tracing::error!(label = label, attempts = attempt, error = %e, "LLM retries exhausted");
                    return Err(SummarizeError::RetriesExhausted { attempts: attempt, last: e });
                }

                let delay = policy.delay_for(attempt - 1, &e);
                tracing::warn!(
                    label = label,
                    attempt = attempt,
                    max_attempts = max_attempts,
                    backoff_ms = delay.as_millis() as u64,
                    error = %e,
                    "LLM request failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

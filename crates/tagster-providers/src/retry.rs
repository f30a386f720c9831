//! Bounded retry with exponential backoff and jitter.
//!
//! Retries transient upstream failures (transport errors, 429, 5xx) up to
//! `retry.max_attempts`; auth and other 4xx failures return immediately.
//! The success-path contract of the wrapped call is unchanged.

use std::time::Duration;

use rand::Rng;
use tagster_core::config::RetryConfig;
use tagster_core::error::{Result, TagsterError};

/// A single failed attempt, classified for the retry loop.
pub enum AttemptError {
    /// Worth retrying (transport error, 429, 5xx).
    Retryable(anyhow::Error),
    /// Not worth retrying — returned to the caller as-is.
    Fatal(TagsterError),
}

impl AttemptError {
    pub fn retryable(source: impl Into<anyhow::Error>) -> Self {
        Self::Retryable(source.into())
    }
}

/// Run `op` until it succeeds, fails fatally, or attempts are exhausted.
///
/// On exhaustion the last retryable cause is wrapped in
/// `TagsterError::Upstream` under the given service name.
pub async fn with_retries<T, F, Fut>(service: &str, policy: &RetryConfig, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, AttemptError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut backoff = Duration::from_millis(policy.initial_backoff_ms);
    let mut last_error: Option<anyhow::Error> = None;

    for attempt in 1..=max_attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(AttemptError::Fatal(e)) => return Err(e),
            Err(AttemptError::Retryable(e)) => {
                tracing::warn!("{service} attempt {attempt}/{max_attempts} failed: {e}");
                last_error = Some(e);
                if attempt < max_attempts {
                    let half = (backoff.as_millis() as u64) / 2;
                    let jitter = if half > 0 {
                        rand::thread_rng().gen_range(0..=half)
                    } else {
                        0
                    };
                    tokio::time::sleep(backoff + Duration::from_millis(jitter)).await;
                    backoff = backoff.saturating_mul(2);
                }
            }
        }
    }

    Err(TagsterError::Upstream {
        service: service.to_string(),
        source: last_error.unwrap_or_else(|| anyhow::anyhow!("request was never attempted")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            initial_backoff_ms: 1,
            request_timeout_secs: 1,
        }
    }

    #[tokio::test]
    async fn test_transient_failure_then_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let result = with_retries("test", &fast_policy(3), || {
            let calls = Arc::clone(&calls);
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(AttemptError::retryable(anyhow::anyhow!("connection reset")))
                } else {
                    Ok(42u32)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fatal_failure_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let result: Result<u32> = with_retries("test", &fast_policy(3), || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(AttemptError::Fatal(TagsterError::ApiKeyMissing("openai".into())))
            }
        })
        .await;

        assert!(matches!(result.unwrap_err(), TagsterError::ApiKeyMissing(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhausted_attempts_wrap_last_cause() {
        let calls = Arc::new(AtomicU32::new(0));
        let result: Result<u32> = with_retries("embeddings", &fast_policy(3), || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(AttemptError::retryable(anyhow::anyhow!("503 service unavailable")))
            }
        })
        .await;

        let err = result.unwrap_err();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match err {
            TagsterError::Upstream { service, source } => {
                assert_eq!(service, "embeddings");
                assert!(source.to_string().contains("503"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

//! Retrying, cancellable invocation wrapper
//!
//! Every adapter routes its outbound requests through an `AsyncCaller`, which
//! provides exponential backoff with jitter, per-call cancellation and
//! timeouts, and an optional limit on in-flight requests.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::llm::core::config::CallOptions;
use crate::llm::core::error::AdapterError;

/// Retry policy configuration
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt (0 disables retrying)
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
    /// Exponential growth factor between retries
    pub backoff_multiplier: f64,
    /// Whether to randomize delays
    pub use_jitter: bool,
    /// Maximum jitter as a fraction of the delay (0.0 to 1.0)
    pub jitter_factor: f64,
    /// Overrides `AdapterError::is_retryable` when set
    pub retry_condition: Option<fn(&AdapterError) -> bool>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 6,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(60),
            backoff_multiplier: 2.0,
            use_jitter: true,
            jitter_factor: 0.1,
            retry_condition: None,
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// A policy that makes exactly one attempt
    pub fn no_retries() -> Self {
        Self::default().with_max_retries(0)
    }

    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub const fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    pub const fn with_jitter(mut self, use_jitter: bool) -> Self {
        self.use_jitter = use_jitter;
        self
    }

    pub fn with_jitter_factor(mut self, factor: f64) -> Self {
        self.jitter_factor = factor.clamp(0.0, 1.0);
        self
    }

    pub fn with_retry_condition(mut self, condition: fn(&AdapterError) -> bool) -> Self {
        self.retry_condition = Some(condition);
        self
    }

    /// Check if an error should be retried
    pub fn should_retry(&self, error: &AdapterError) -> bool {
        match self.retry_condition {
            Some(condition) => condition(error),
            None => error.is_retryable(),
        }
    }

    /// Delay before retry number `retry` (zero-based)
    pub fn calculate_delay(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let base_delay = self.initial_delay.as_millis() as f64 * self.backoff_multiplier.powi(exponent);

        let delay = Duration::from_millis(base_delay as u64).min(self.max_delay);

        if self.use_jitter {
            self.add_jitter(delay)
        } else {
            delay
        }
    }

    fn add_jitter(&self, delay: Duration) -> Duration {
        let jitter_range = delay.as_millis() as f64 * self.jitter_factor;
        if jitter_range <= 0.0 {
            return delay;
        }
        let jitter = rand::thread_rng().gen_range(-jitter_range..=jitter_range);

        let new_delay = delay.as_millis() as f64 + jitter;
        Duration::from_millis(new_delay.max(0.0) as u64)
    }
}

/// Shared retrying caller
///
/// Cloning is cheap; clones share the concurrency limit.
#[derive(Debug, Clone, Default)]
pub struct AsyncCaller {
    policy: RetryPolicy,
    limiter: Option<Arc<Semaphore>>,
}

impl AsyncCaller {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            limiter: None,
        }
    }

    /// Allow at most `max` calls in flight at once
    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.limiter = Some(Arc::new(Semaphore::new(max.max(1))));
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `operation` until it succeeds, fails terminally, or retries run out
    ///
    /// The cancellation token and timeout in `options` apply to the whole call,
    /// including backoff sleeps. A token that is already cancelled fails the
    /// call before `operation` runs.
    pub async fn call<F, Fut, T>(&self, options: &CallOptions, operation: F) -> Result<T, AdapterError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AdapterError>>,
    {
        let run = async {
            let attempts = self.run_with_retries(operation);
            match options.timeout {
                Some(limit) => match tokio::time::timeout(limit, attempts).await {
                    Ok(result) => result,
                    Err(_) => Err(AdapterError::Timeout(limit)),
                },
                None => attempts.await,
            }
        };

        match &options.signal {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        debug!("provider call cancelled");
                        Err(AdapterError::Cancelled)
                    }
                    result = run => result,
                }
            }
            None => run.await,
        }
    }

    async fn run_with_retries<F, Fut, T>(&self, mut operation: F) -> Result<T, AdapterError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AdapterError>>,
    {
        let _permit = match &self.limiter {
            Some(limiter) => Some(limiter.acquire().await.map_err(|_| {
                AdapterError::InvalidRequest("caller concurrency limiter closed".to_string())
            })?),
            None => None,
        };

        let mut retry = 0;
        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(error) if retry < self.policy.max_retries && self.policy.should_retry(&error) => {
                    let delay = self.policy.calculate_delay(retry);
                    warn!(
                        attempt = retry + 1,
                        max_retries = self.policy.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "retrying provider call"
                    );
                    tokio::time::sleep(delay).await;
                    retry += 1;
                }
                Err(error) => {
                    debug!(attempts = retry + 1, error = %error, "provider call failed");
                    return Err(error);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio_util::sync::CancellationToken;

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy::new()
            .with_max_retries(max_retries)
            .with_initial_delay(Duration::from_millis(1))
            .with_jitter(false)
    }

    fn server_error() -> AdapterError {
        AdapterError::Transport {
            url: "http://mock".to_string(),
            message: "connection reset".to_string(),
        }
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 6);
        assert_eq!(policy.initial_delay, Duration::from_secs(1));
        assert_eq!(policy.backoff_multiplier, 2.0);
    }

    #[test]
    fn test_calculate_delay_exponential_and_capped() {
        let policy = RetryPolicy::new()
            .with_initial_delay(Duration::from_millis(100))
            .with_max_delay(Duration::from_millis(500))
            .with_jitter(false);

        assert_eq!(policy.calculate_delay(0), Duration::from_millis(100));
        assert_eq!(policy.calculate_delay(1), Duration::from_millis(200));
        assert_eq!(policy.calculate_delay(2), Duration::from_millis(400));
        assert_eq!(policy.calculate_delay(3), Duration::from_millis(500));
    }

    #[test]
    fn test_huge_retry_count_stays_capped() {
        let policy = RetryPolicy::new().with_jitter(false);
        assert_eq!(policy.calculate_delay(u32::MAX), policy.max_delay);
        assert_eq!(policy.calculate_delay(i32::MAX as u32 + 1), policy.max_delay);
    }

    #[test]
    fn test_jitter_stays_in_range() {
        let policy = RetryPolicy::new()
            .with_initial_delay(Duration::from_millis(1000))
            .with_jitter_factor(0.1);

        for _ in 0..50 {
            let delay = policy.calculate_delay(0).as_millis();
            assert!((900..=1100).contains(&delay), "delay out of range: {}", delay);
        }
    }

    #[tokio::test]
    async fn test_retries_retryable_errors_until_success() {
        let caller = AsyncCaller::new(fast_policy(3));
        let attempts = AtomicUsize::new(0);

        let result = caller
            .call(&CallOptions::default(), || {
                let n = attempts.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(server_error())
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let caller = AsyncCaller::new(fast_policy(2));
        let attempts = AtomicUsize::new(0);

        let result: Result<(), _> = caller
            .call(&CallOptions::default(), || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(server_error()) }
            })
            .await;

        assert!(matches!(result, Err(AdapterError::Transport { .. })));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_terminal_error_not_retried() {
        let caller = AsyncCaller::new(fast_policy(5));
        let attempts = AtomicUsize::new(0);

        let result: Result<(), _> = caller
            .call(&CallOptions::default(), || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(AdapterError::EmptyResult {
                        provider: "AI21".to_string(),
                        field: "completions".to_string(),
                    })
                }
            })
            .await;

        assert!(matches!(result, Err(AdapterError::EmptyResult { .. })));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_custom_retry_condition() {
        let caller = AsyncCaller::new(fast_policy(5).with_retry_condition(|_| false));
        let attempts = AtomicUsize::new(0);

        let _: Result<(), _> = caller
            .call(&CallOptions::default(), || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(server_error()) }
            })
            .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_already_cancelled_token_skips_operation() {
        let caller = AsyncCaller::default();
        let token = CancellationToken::new();
        token.cancel();
        let attempts = AtomicUsize::new(0);

        let result: Result<(), _> = caller
            .call(&CallOptions::default().with_signal(token), || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Ok(()) }
            })
            .await;

        assert!(matches!(result, Err(AdapterError::Cancelled)));
        assert_eq!(attempts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cancel_interrupts_backoff() {
        let caller = AsyncCaller::new(
            RetryPolicy::new()
                .with_initial_delay(Duration::from_secs(30))
                .with_jitter(false),
        );
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let result: Result<(), _> = tokio::time::timeout(
            Duration::from_secs(2),
            caller.call(&CallOptions::default().with_signal(token), || async {
                Err(server_error())
            }),
        )
        .await
        .expect("cancellation should end the call promptly");

        assert!(matches!(result, Err(AdapterError::Cancelled)));
    }

    #[tokio::test]
    async fn test_timeout() {
        let caller = AsyncCaller::new(RetryPolicy::no_retries());
        let options = CallOptions::default().with_timeout(Duration::from_millis(20));

        let result: Result<(), _> = caller
            .call(&options, || async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(AdapterError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_max_concurrency_serializes_calls() {
        let caller = AsyncCaller::new(RetryPolicy::no_retries()).with_max_concurrency(1);
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let caller = caller.clone();
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);
            handles.push(tokio::spawn(async move {
                caller
                    .call(&CallOptions::default(), || {
                        let in_flight = Arc::clone(&in_flight);
                        let peak = Arc::clone(&peak);
                        async move {
                            let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                            peak.fetch_max(now, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(5)).await;
                            in_flight.fetch_sub(1, Ordering::SeqCst);
                            Ok::<_, AdapterError>(())
                        }
                    })
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }
}

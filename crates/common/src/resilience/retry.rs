//! Generic retry strategy with error classification.
//!
//! A [`RetryExecutor`] wraps a zero-argument async operation and re-runs
//! it under a [`RetryPolicy`]. The policy is consulted on every failure,
//! before the attempt budget: a non-retryable error therefore propagates
//! immediately even when attempts remain. When the budget runs out the
//! executor fails with the last error the operation produced.

use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur during retry operations
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// All attempts were used up; carries the last error seen.
    #[error("all {attempts} attempts exhausted, last error: {source}")]
    AttemptsExhausted { attempts: u32, source: E },

    /// The operation failed with an error the policy refuses to retry.
    #[error("non-retryable error: {source}")]
    NonRetryable { source: E },

    /// The retry configuration is invalid.
    #[error("invalid retry configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl<E> RetryError<E> {
    /// Unwrap back to the underlying operation error, if there is one.
    pub fn into_source(self) -> Option<E> {
        match self {
            RetryError::AttemptsExhausted { source, .. } | RetryError::NonRetryable { source } => {
                Some(source)
            }
            RetryError::InvalidConfiguration { .. } => None,
        }
    }
}

/// Result type for retry operations
pub type RetryResult<T, E> = Result<T, RetryError<E>>;

/// Trait for determining whether an error should be retried
pub trait RetryPolicy<E> {
    /// Decide what to do with `error` observed on 0-based `attempt`.
    fn should_retry(&self, error: &E, attempt: u32) -> RetryDecision;
}

/// Decision for whether to retry an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry the operation with the default backoff delay
    Retry,
    /// Retry the operation with a custom delay
    RetryAfter(Duration),
    /// Don't retry the operation
    Stop,
}

/// Backoff strategy for calculating retry delays
#[derive(Debug, Clone, PartialEq)]
pub enum BackoffStrategy {
    /// Fixed delay between retries
    Fixed(Duration),
    /// Exponential backoff: initial_delay * factor^attempt, capped at max_delay
    Exponential { initial_delay: Duration, factor: f64, max_delay: Duration },
}

impl BackoffStrategy {
    /// Calculate the delay for the given 0-based attempt.
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        match self {
            BackoffStrategy::Fixed(delay) => *delay,
            BackoffStrategy::Exponential { initial_delay, factor, max_delay } => {
                let delay = initial_delay.as_millis() as f64 * factor.powi(attempt as i32);
                let delay_ms = delay.min(max_delay.as_millis() as f64) as u64;
                Duration::from_millis(delay_ms)
            }
        }
    }
}

/// Jitter type for adding randomness to retry delays
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Jitter {
    /// No jitter
    None,
    /// Full jitter: 0 to calculated_delay
    Full,
}

impl Jitter {
    /// Apply jitter to the calculated delay
    pub fn apply(&self, delay: Duration) -> Duration {
        match self {
            Jitter::None => delay,
            Jitter::Full => Duration::from_millis(random_value(delay.as_millis() as u64)),
        }
    }
}

/// Pseudo-random value from a timing-based seed.
///
/// A simple LCG keeps the crate free of a rand dependency; jitter only
/// needs rough distribution, not quality randomness.
fn random_value(max: u64) -> u64 {
    if max == 0 {
        return 0;
    }

    let nanos = Instant::now().elapsed().subsec_nanos() as u64;
    let mut seed = nanos.wrapping_mul(1664525).wrapping_add(1013904223);
    seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
    seed % max
}

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (initial try included).
    pub max_attempts: u32,
    /// Backoff strategy for calculating delays
    pub backoff: BackoffStrategy,
    /// Jitter type for randomizing delays
    pub jitter: Jitter,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff: BackoffStrategy::Exponential {
                initial_delay: Duration::from_millis(1500),
                factor: 2.0,
                max_delay: Duration::from_secs(60),
            },
            jitter: Jitter::None,
        }
    }
}

impl RetryConfig {
    /// Create a configuration builder.
    pub fn builder() -> RetryConfigBuilder {
        RetryConfigBuilder::new()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), RetryError<()>> {
        if self.max_attempts == 0 {
            return Err(RetryError::InvalidConfiguration {
                message: "max_attempts must be greater than 0".to_string(),
            });
        }

        if let BackoffStrategy::Exponential { factor, .. } = &self.backoff {
            if *factor <= 0.0 {
                return Err(RetryError::InvalidConfiguration {
                    message: "exponential factor must be greater than 0".to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Builder for [`RetryConfig`] with fluent API
#[derive(Debug, Default)]
pub struct RetryConfigBuilder {
    config: RetryConfig,
}

impl RetryConfigBuilder {
    pub fn new() -> Self {
        Self { config: RetryConfig::default() }
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.max_attempts = attempts;
        self
    }

    pub fn fixed_backoff(mut self, delay: Duration) -> Self {
        self.config.backoff = BackoffStrategy::Fixed(delay);
        self
    }

    pub fn exponential_backoff(
        mut self,
        initial_delay: Duration,
        factor: f64,
        max_delay: Duration,
    ) -> Self {
        self.config.backoff = BackoffStrategy::Exponential { initial_delay, factor, max_delay };
        self
    }

    pub fn no_jitter(mut self) -> Self {
        self.config.jitter = Jitter::None;
        self
    }

    pub fn full_jitter(mut self) -> Self {
        self.config.jitter = Jitter::Full;
        self
    }

    pub fn build(self) -> Result<RetryConfig, RetryError<()>> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// The retry executor.
///
/// Holds a config, a policy, and a label that shows up in every log event
/// so retries can be traced back to the endpoint that caused them.
pub struct RetryExecutor<P> {
    config: RetryConfig,
    policy: P,
    label: String,
}

impl<P> RetryExecutor<P> {
    /// Create a new retry executor with the given configuration and policy
    pub fn new(config: RetryConfig, policy: P) -> Self {
        Self { config, policy, label: "operation".to_string() }
    }

    /// Create with default configuration
    pub fn with_policy(policy: P) -> Self {
        Self::new(RetryConfig::default(), policy)
    }

    /// Attach a label (typically the endpoint) used in log events.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Execute an operation with retry logic.
    ///
    /// The operation runs at least once. After a failure the policy is
    /// consulted first: `Stop` propagates the error immediately as
    /// [`RetryError::NonRetryable`] regardless of remaining attempts.
    /// Otherwise the executor sleeps for the backoff delay and retries
    /// until attempts run out, at which point it fails with
    /// [`RetryError::AttemptsExhausted`] carrying the last error.
    pub async fn execute<F, Fut, T, E>(&self, mut operation: F) -> RetryResult<T, E>
    where
        P: RetryPolicy<E>,
        E: fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt: u32 = 0;

        loop {
            debug!(
                endpoint = %self.label,
                attempt = attempt + 1,
                max_attempts,
                "executing operation"
            );

            match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(
                            endpoint = %self.label,
                            retries = attempt,
                            "operation succeeded after retries"
                        );
                    }
                    return Ok(value);
                }
                Err(error) => match self.policy.should_retry(&error, attempt) {
                    RetryDecision::Stop => {
                        warn!(
                            endpoint = %self.label,
                            attempt = attempt + 1,
                            error = %error,
                            "non-retryable failure"
                        );
                        return Err(RetryError::NonRetryable { source: error });
                    }
                    decision => {
                        if attempt + 1 >= max_attempts {
                            warn!(
                                endpoint = %self.label,
                                attempts = max_attempts,
                                error = %error,
                                "attempts exhausted"
                            );
                            return Err(RetryError::AttemptsExhausted {
                                attempts: max_attempts,
                                source: error,
                            });
                        }

                        let delay = match decision {
                            RetryDecision::RetryAfter(custom) => custom,
                            _ => self.config.jitter.apply(self.config.backoff.calculate_delay(attempt)),
                        };
                        warn!(
                            endpoint = %self.label,
                            attempt = attempt + 1,
                            delay_ms = delay.as_millis() as u64,
                            error = %error,
                            "transient failure, retrying after backoff"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                },
            }
        }
    }
}

/// Pre-defined retry policies for common scenarios
pub mod policies {
    use super::{RetryDecision, RetryPolicy};

    /// Always retry policy - retries on any error
    #[derive(Debug, Clone)]
    pub struct AlwaysRetry;

    impl<E> RetryPolicy<E> for AlwaysRetry {
        fn should_retry(&self, _error: &E, _attempt: u32) -> RetryDecision {
            RetryDecision::Retry
        }
    }

    /// Never retry policy - never retries
    #[derive(Debug, Clone)]
    pub struct NeverRetry;

    impl<E> RetryPolicy<E> for NeverRetry {
        fn should_retry(&self, _error: &E, _attempt: u32) -> RetryDecision {
            RetryDecision::Stop
        }
    }

    /// Predicate-based retry policy
    #[derive(Debug)]
    pub struct PredicateRetry<F> {
        predicate: F,
    }

    impl<F> PredicateRetry<F> {
        pub fn new(predicate: F) -> Self {
            Self { predicate }
        }
    }

    impl<F, E> RetryPolicy<E> for PredicateRetry<F>
    where
        F: Fn(&E, u32) -> bool,
    {
        fn should_retry(&self, error: &E, attempt: u32) -> RetryDecision {
            if (self.predicate)(error, attempt) {
                RetryDecision::Retry
            } else {
                RetryDecision::Stop
            }
        }
    }
}

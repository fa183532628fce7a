//! Resilience primitives for unreliable external calls.

pub mod retry;

pub use retry::{
    BackoffStrategy, Jitter, RetryConfig, RetryDecision, RetryError, RetryExecutor, RetryPolicy,
    RetryResult,
};

//! # Transtat Common
//!
//! Cross-cutting utilities shared by every transtat crate.
//!
//! Currently this hosts the resilience primitives: a generic retry
//! executor with pluggable policies and backoff strategies, used by the
//! infrastructure layer to survive a flaky remote API.

pub mod resilience;

pub use resilience::retry::{
    BackoffStrategy, Jitter, RetryConfig, RetryDecision, RetryError, RetryExecutor, RetryPolicy,
    RetryResult,
};

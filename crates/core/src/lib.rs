//! # Transtat Core
//!
//! Pure aggregation logic - no infrastructure dependencies.
//!
//! This crate contains:
//! - The projects gateway port (trait) implemented by the API layer
//! - The statistics normalizer (per-project window-filtered reduction)
//! - The aggregation service (cross-project merge)
//! - The locale → display-name lookup
//!
//! ## Architecture Principles
//! - Only depends on `transtat-domain`
//! - No HTTP, filesystem, or clock access
//! - All external dependencies via traits

pub mod stats;

pub use stats::languages::language_name;
pub use stats::normalizer::{canonical_step_name, normalize, NormalizedProject};
pub use stats::ports::ProjectsGateway;
pub use stats::service::AggregationService;

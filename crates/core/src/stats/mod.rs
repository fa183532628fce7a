//! Statistics aggregation pipeline: gateway port, per-project
//! normalization, cross-project aggregation service.

pub mod languages;
pub mod normalizer;
pub mod ports;
pub mod service;

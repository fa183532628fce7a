//! XTM Cloud API integration.

pub mod client;

pub use client::{ApiRetryPolicy, XtmClient};

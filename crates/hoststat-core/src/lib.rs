//! hoststat-core: host metrics snapshot library.
//!
//! Provides:
//! - `collector`: disk and operating-system probes, CPU sampling, `MetricsCollector`
//! - `model`: `MetricsSnapshot` and its parts
//! - `units`: byte count conversions (KB/MB/GB)
//! - `provider`: snapshot source abstraction for front ends
//! - `fmt`: human-readable formatting helpers
//!
//! With `api` feature: OpenAPI schemas on the model types.

pub mod collector;
pub mod fmt;
pub mod model;
pub mod provider;
pub mod units;

/// Crate version with the git commit it was built from.
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_SHA"), ")");

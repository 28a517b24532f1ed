//! Shared building blocks for the VoltaPets crates: response types,
//! logging bootstrap and Prometheus metrics.

pub mod types;
pub mod utils;
pub mod metrics;

//! tcpcheck-metrics — endpoint status gauges and Prometheus exposition.
//!
//! # Architecture
//!
//! ```text
//! MetricsRegistry
//!   ├── set_up() ← called once per probe completion
//!   └── snapshot() → sorted (labels, value) pairs
//!
//! Prometheus exposition
//!   └── render_prometheus() → text/plain for /metrics endpoint
//! ```
//!
//! Series are keyed by [`TargetLabels`](tcpcheck_core::TargetLabels) and
//! live for the whole process. A write always overwrites.

pub mod prometheus;
pub mod registry;

pub use prometheus::{UP_METRIC, render_prometheus};
pub use registry::MetricsRegistry;

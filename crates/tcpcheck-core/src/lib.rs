//! tcpcheck-core — shared types for the tcpcheck exporter.
//!
//! Holds the probe [`Target`] model with its label defaults, the
//! [`TargetLabels`] tuple that keys every metric series, and the YAML
//! config loader.
//!
//! # Config Fallback
//!
//! [`load_targets`] never fails: a missing file, malformed YAML, or an
//! empty `targets` list all resolve to a single built-in target
//! (`google.com:443`). The exporter always has something to probe.

pub mod config;
pub mod error;
pub mod target;

pub use config::{DEFAULT_CONFIG_PATH, TargetsConfig, load_targets};
pub use error::{ConfigError, ConfigResult};
pub use target::{DEFAULT_ENV, Target, TargetLabels};

//! Environment-driven runtime settings.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

pub const CHECK_INTERVAL_VAR: &str = "CHECK_INTERVAL_SECONDS";
pub const METRICS_PORT_VAR: &str = "METRICS_PORT";
pub const MAX_CONCURRENT_PROBES_VAR: &str = "MAX_CONCURRENT_PROBES";

pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_METRICS_PORT: &str = "2112";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub check_interval: Duration,
    /// Kept as text until bind time; a bad value is a startup error there.
    pub metrics_port: String,
    /// `None` means one concurrent probe per target.
    pub max_concurrent_probes: Option<usize>,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable source.
    ///
    /// Non-positive or unparsable intervals and empty ports fall back to
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let check_interval_secs = lookup(CHECK_INTERVAL_VAR)
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|secs| *secs > 0)
            .map_or(DEFAULT_CHECK_INTERVAL_SECS, |secs| secs as u64);

        let metrics_port = lookup(METRICS_PORT_VAR)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_METRICS_PORT.to_string());

        let max_concurrent_probes = lookup(MAX_CONCURRENT_PROBES_VAR)
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|n| *n > 0);

        Self {
            check_interval: Duration::from_secs(check_interval_secs),
            metrics_port,
            max_concurrent_probes,
        }
    }

    /// Listen address for the metrics server on all interfaces.
    pub fn metrics_addr(&self) -> anyhow::Result<SocketAddr> {
        let port: u16 = self
            .metrics_port
            .trim()
            .parse()
            .with_context(|| format!("invalid {METRICS_PORT_VAR} value {:?}", self.metrics_port))?;
        Ok(SocketAddr::from(([0, 0, 0, 0], port)))
    }
}

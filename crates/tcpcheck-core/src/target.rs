//! Probe targets and the metric label model.

use std::fmt;

/// Environment tag applied when a target does not set one.
pub const DEFAULT_ENV: &str = "default";

const DEFAULT_HOST: &str = "google.com";
const DEFAULT_PORT: i64 = 443;

/// A TCP endpoint to probe.
///
/// Defaults are applied at construction and the fields are read-only
/// afterwards. Host and port are not validated; a bad value surfaces as
/// a failed dial.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    host: String,
    port: i64,
    env: String,
    alias: String,
}

impl Target {
    /// Build a target, defaulting an empty `env` to `"default"` and an
    /// empty `alias` to the host.
    pub fn new(
        host: impl Into<String>,
        port: i64,
        env: Option<String>,
        alias: Option<String>,
    ) -> Self {
        let host = host.into();
        let env = env
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| DEFAULT_ENV.to_string());
        let alias = alias.filter(|a| !a.is_empty()).unwrap_or_else(|| host.clone());
        Self {
            host,
            port,
            env,
            alias,
        }
    }

    /// The built-in target used when no usable config exists.
    pub fn default_target() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT, None, None)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> i64 {
        self.port
    }

    pub fn env(&self) -> &str {
        &self.env
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Dial address in `host:port` form.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether env or alias differ from their defaults.
    pub fn is_annotated(&self) -> bool {
        self.env != DEFAULT_ENV || self.alias != self.host
    }

    /// The label tuple identifying this target's metric series.
    pub fn labels(&self) -> TargetLabels {
        TargetLabels {
            host: self.host.clone(),
            port: self.port.to_string(),
            env: self.env.clone(),
            alias: self.alias.clone(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// `(host, port, env, alias)` — one metric series per distinct tuple.
///
/// Ordering is field-wise, which gives the exposition a stable order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetLabels {
    pub host: String,
    pub port: String,
    pub env: String,
    pub alias: String,
}

impl TargetLabels {
    /// Label names in exposition order.
    pub const NAMES: [&'static str; 4] = ["host", "port", "env", "alias"];

    /// Label values in the same order as [`Self::NAMES`].
    pub fn values(&self) -> [&str; 4] {
        [&self.host, &self.port, &self.env, &self.alias]
    }
}

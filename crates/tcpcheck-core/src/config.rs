//! YAML target config loader.
//!
//! ```yaml
//! targets:
//!   - host: db.internal
//!     port: 5432
//!     env: production
//!     alias: primary-db
//!   - host: example.com
//!     port: 443
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::target::Target;

/// Path read when no `--config` override is given.
pub const DEFAULT_CONFIG_PATH: &str = "/config/config.yml";

/// Parsed config document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TargetsConfig {
    #[serde(default)]
    pub targets: Vec<TargetEntry>,
}

/// One raw `targets` entry, before defaults are applied.
///
/// `port` is any integer; out-of-range values load and fail at dial time.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetEntry {
    pub host: String,
    pub port: i64,
    #[serde(default)]
    pub env: Option<String>,
    #[serde(default)]
    pub alias: Option<String>,
}

impl From<TargetEntry> for Target {
    fn from(entry: TargetEntry) -> Self {
        Target::new(entry.host, entry.port, entry.env, entry.alias)
    }
}

impl TargetsConfig {
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Normalize entries into targets. An empty list is an error.
    pub fn into_targets(self) -> ConfigResult<Vec<Target>> {
        if self.targets.is_empty() {
            return Err(ConfigError::Empty);
        }
        Ok(self.targets.into_iter().map(Target::from).collect())
    }
}

/// Load targets from `path`, falling back to [`Target::default_target`]
/// on any error.
///
/// Operator mistakes (a typo in the YAML, a wrong mount) are only
/// visible in the warning log; the exporter still starts.
pub fn load_targets(path: &Path) -> Vec<Target> {
    info!(path = %path.display(), "loading target configuration");

    match TargetsConfig::from_file(path).and_then(TargetsConfig::into_targets) {
        Ok(targets) => {
            info!(count = targets.len(), "loaded targets from configuration");
            targets
        }
        Err(e) => {
            let fallback = Target::default_target();
            warn!(error = %e, fallback = %fallback, "using default target");
            vec![fallback]
        }
    }
}

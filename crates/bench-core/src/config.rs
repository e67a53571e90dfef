use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_PUBLISHER: &str = "Frappe Technologies, Inc";
pub const DEFAULT_PATCH_VERSION: &str = "v1";
pub const DEFAULT_SITE_DB_FILE: &str = "bench_manager.redb";

/// Optional per-bench settings read from `<bench>/bench_manager.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Publisher used in stub headers when an app's hooks.py names none.
    #[serde(default = "default_publisher")]
    pub default_publisher: String,
    #[serde(default = "default_patch_version")]
    pub default_patch_version: String,
    /// File name of the document store inside each site directory.
    #[serde(default = "default_site_db_file")]
    pub site_db_file: String,
}

fn default_publisher() -> String {
    DEFAULT_PUBLISHER.to_string()
}

fn default_patch_version() -> String {
    DEFAULT_PATCH_VERSION.to_string()
}

fn default_site_db_file() -> String {
    DEFAULT_SITE_DB_FILE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_publisher: default_publisher(),
            default_patch_version: default_patch_version(),
            site_db_file: default_site_db_file(),
        }
    }
}

impl Config {
    /// Load the bench config, falling back to defaults when the file is absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(&data)?;
        tracing::debug!(path = %path.display(), "loaded bench config");
        Ok(config)
    }
}

//! Vault configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default note cache time-to-live.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
/// Default directory name pruned from indexing walks.
pub const DEFAULT_TEMPLATES_DIR: &str = "templates";
/// Default tag hiding a note from listings and aggregation.
pub const DEFAULT_IGNORE_TAG: &str = "draft";

/// Configuration for one vault service instance.
///
/// How these values are sourced (environment, files, flags) is the
/// embedder's concern; the service only consumes the plain data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Root directory of the note tree.
    pub root: PathBuf,
    /// Notes carrying this tag are hidden from listings, tag
    /// aggregation, and the graph; `None` disables the filter. Hidden
    /// notes stay fetchable by id.
    pub ignore_tag: Option<String>,
    /// Directory name excluded from indexing walks.
    pub templates_dir: String,
    /// Note cache time-to-live in seconds.
    pub cache_ttl_secs: u64,
}

impl VaultConfig {
    /// Config rooted at `root` with all other fields defaulted.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("vault"),
            ignore_tag: Some(DEFAULT_IGNORE_TAG.to_string()),
            templates_dir: DEFAULT_TEMPLATES_DIR.to_string(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

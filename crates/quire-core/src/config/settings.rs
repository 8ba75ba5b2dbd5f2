use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Engine settings, persisted as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Prefix unread item titles with a bullet marker.
    #[serde(default = "default_true")]
    pub show_unread_items: bool,

    /// Include encrypted sections in results.
    #[serde(default = "default_true")]
    pub show_encrypted_sections: bool,

    /// Include recycle-bin subtrees in results.
    #[serde(default = "default_true")]
    pub show_recycle_bins: bool,

    /// Seconds of idle time before the store handle is released.
    #[serde(default = "default_idle_timeout")]
    pub store_idle_timeout_secs: u64,

    /// Default number of rows for recent-pages queries.
    #[serde(default = "default_recent_count")]
    pub recent_page_count: usize,

    /// Lifetime of cached query results, in seconds.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

fn default_true() -> bool {
    true
}
fn default_idle_timeout() -> u64 {
    10
}
fn default_recent_count() -> usize {
    10
}
fn default_cache_ttl() -> u64 {
    86_400
}

const IDLE_TIMEOUT_MIN_SECS: u64 = 1;
const IDLE_TIMEOUT_MAX_SECS: u64 = 120;

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_unread_items: true,
            show_encrypted_sections: true,
            show_recycle_bins: true,
            store_idle_timeout_secs: default_idle_timeout(),
            recent_page_count: default_recent_count(),
            cache_ttl_secs: default_cache_ttl(),
        }
    }
}

impl Settings {
    /// Load settings from file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid JSON.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Save settings to file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Idle timeout for the store handle, clamped to a sane range.
    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(
            self.store_idle_timeout_secs
                .clamp(IDLE_TIMEOUT_MIN_SECS, IDLE_TIMEOUT_MAX_SECS),
        )
    }

    /// Lifetime of cached query results.
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

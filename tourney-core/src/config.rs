//! Engine configuration
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::merge::MergePolicy;
use crate::sort::SortKey;
use crate::submission::ParsePolicy;

/// Storage key the roster has always been written under.
pub const DEFAULT_STORAGE_KEY: &str = "players";

/// Tunables for a [`crate::StatsEngine`]. Every field is optional in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub storage_key: String,
    pub merge_policy: MergePolicy,
    pub parse_policy: ParsePolicy,
    pub default_sort: SortKey,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            merge_policy: MergePolicy::default(),
            parse_policy: ParsePolicy::default(),
            default_sort: SortKey::default(),
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Parse a configuration document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the storage key is blank.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        if config.storage_key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        Ok(config)
    }

    #[must_use]
    pub const fn with_merge_policy(mut self, policy: MergePolicy) -> Self {
        self.merge_policy = policy;
        self
    }

    #[must_use]
    pub const fn with_parse_policy(mut self, policy: ParsePolicy) -> Self {
        self.parse_policy = policy;
        self
    }
}

//! Bridge configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings namespace of the plugin
pub const PREFS_ROOT: &str = "/plugins/core/wincred";

/// Preference path of the clear-from-memory toggle
pub const CLEAR_MEMORY_PREF: &str = "/plugins/core/wincred/clear_memory";

/// Human label of the clear-from-memory toggle
pub const CLEAR_MEMORY_LABEL: &str = "Clear plaintext passwords from memory";

/// Configuration passed to the bridge at construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Release the registry's copy of a secret after it has been stored
    pub clear_secret_after_store: bool,
    /// Strip store key text appended to retrieved secrets
    pub repair_contamination: bool,
    /// Upper bound on each platform call, in milliseconds
    pub platform_timeout_ms: Option<u64>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            clear_secret_after_store: false,
            repair_contamination: true,
            platform_timeout_ms: None,
        }
    }
}

impl BridgeConfig {
    /// Platform call bound as a duration
    #[must_use]
    pub fn platform_timeout(&self) -> Option<Duration> {
        self.platform_timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    /// Builder-style toggle for memory clearing
    #[must_use]
    pub fn with_clear_secret_after_store(mut self, enabled: bool) -> Self {
        self.clear_secret_after_store = enabled;
        self
    }

    /// Builder-style toggle for contamination repair
    #[must_use]
    pub fn with_repair_contamination(mut self, enabled: bool) -> Self {
        self.repair_contamination = enabled;
        self
    }
}

/// A boolean preference as shown in a host settings frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreferenceDescriptor {
    /// Preference path
    pub path: &'static str,
    /// Label shown to the user
    pub label: &'static str,
    /// Value before the user changes it
    pub default: bool,
}

/// Preferences the plugin registers
#[must_use]
pub fn preferences() -> Vec<PreferenceDescriptor> {
    vec![PreferenceDescriptor {
        path: CLEAR_MEMORY_PREF,
        label: CLEAR_MEMORY_LABEL,
        default: BridgeConfig::default().clear_secret_after_store,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert!(!config.clear_secret_after_store);
        assert!(config.repair_contamination);
        assert_eq!(config.platform_timeout(), None);
    }

    #[test]
    fn test_partial_toml() {
        let config: BridgeConfig =
            toml::from_str("clear_secret_after_store = true\nplatform_timeout_ms = 250").unwrap();
        assert!(config.clear_secret_after_store);
        assert!(config.repair_contamination);
        assert_eq!(config.platform_timeout(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_zero_timeout_disables_bound() {
        let config = BridgeConfig {
            platform_timeout_ms: Some(0),
            ..BridgeConfig::default()
        };
        assert_eq!(config.platform_timeout(), None);
    }

    #[test]
    fn test_preferences() {
        let prefs = preferences();
        assert_eq!(prefs.len(), 1);
        assert!(prefs[0].path.starts_with(PREFS_ROOT));
        assert_eq!(prefs[0].label, CLEAR_MEMORY_LABEL);
        assert!(!prefs[0].default);
    }
}

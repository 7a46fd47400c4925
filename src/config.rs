//! Engine configuration.
//!
//! Every knob has a default matching the playground's behavior, so an empty
//! JSON object (`{}`) is a complete configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::EngineResult;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Quiet period after the last edit before a transform runs.
    pub debounce_ms: u64,
    /// How long a failing transform must stay current before it is surfaced.
    pub error_grace_ms: u64,
    /// Iterations a single guarded loop may run before it throws.
    pub loop_guard_threshold: u32,
    pub console_capacity: usize,
    pub cdn_base: String,
    /// `{specifier}` is replaced with the bare package specifier.
    pub fallback_url_template: String,
    pub ui_bundle_url: String,
    pub utils_module_url: String,
    pub max_snippet_bytes: usize,
    pub max_registry_bytes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 150,
            error_grace_ms: 500,
            loop_guard_threshold: 100_000,
            console_capacity: 500,
            cdn_base: "https://esm.sh".to_string(),
            fallback_url_template: "https://esm.sh/{specifier}?external=react,react-dom"
                .to_string(),
            ui_bundle_url: "/playground/modules/ui.js".to_string(),
            utils_module_url: "/playground/modules/utils.js".to_string(),
            max_snippet_bytes: 100 * 1024,
            max_registry_bytes: 100 * 1024,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn error_grace(&self) -> Duration {
        Duration::from_millis(self.error_grace_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    #[test]
    fn empty_object_is_default() {
        let config = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn partial_override() {
        let config = EngineConfig::from_json_str(r#"{"debounceMs": 40, "consoleCapacity": 10}"#)
            .unwrap();
        assert_eq!(config.debounce(), Duration::from_millis(40));
        assert_eq!(config.console_capacity, 10);
        assert_eq!(config.error_grace_ms, 500);
    }

    #[test]
    fn invalid_json_is_config_error() {
        let err = EngineConfig::from_json_str("{debounce").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }
}

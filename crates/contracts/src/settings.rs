//! ProjectSettings - Settings Fetcher output
//!
//! Remote per-project document describing which backends are enabled and how
//! they are configured.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::{BackendId, ContractError};

/// Settings document fetched once per process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Settings key -> backend-specific settings.
    ///
    /// Keys this build does not know are kept but never activated.
    #[serde(default)]
    pub integrations: BTreeMap<String, BackendSettings>,
}

impl ProjectSettings {
    /// Settings for `id`, or `None` when the backend is not enabled for this project.
    ///
    /// A missing key, `null` and `false` all mean "not enabled".
    pub fn settings_for(&self, id: BackendId) -> Option<&BackendSettings> {
        self.integrations
            .get(id.settings_key())
            .filter(|settings| settings.is_enabled())
    }

    /// Backends this document enables, in `BackendId` order.
    pub fn enabled(&self) -> Vec<BackendId> {
        BackendId::ALL
            .into_iter()
            .filter(|id| self.settings_for(*id).is_some())
            .collect()
    }

    /// Builder-style insert, mostly for tests and fixtures.
    pub fn with_backend(mut self, id: BackendId, settings: Value) -> Self {
        self.integrations
            .insert(id.settings_key().to_string(), BackendSettings(settings));
        self
    }
}

/// Opaque settings for one backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackendSettings(pub Value);

impl BackendSettings {
    fn is_enabled(&self) -> bool {
        !matches!(self.0, Value::Null | Value::Bool(false))
    }

    /// Settings as a JSON object.
    pub fn as_object(&self, id: BackendId) -> Result<&Map<String, Value>, ContractError> {
        self.0
            .as_object()
            .ok_or_else(|| ContractError::config(id, "settings must be an object"))
    }

    /// String setting, if present.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Non-empty string setting required for construction.
    pub fn require_str(&self, id: BackendId, key: &str) -> Result<&str, ContractError> {
        self.as_object(id)?;
        match self.get_str(key) {
            Some(value) if !value.trim().is_empty() => Ok(value),
            Some(_) => Err(ContractError::config(id, format!("'{key}' is empty"))),
            None => Err(ContractError::config(id, format!("missing '{key}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_and_false_are_disabled() {
        let settings: ProjectSettings = serde_json::from_value(json!({
            "integrations": {
                "Amplitude": { "apiKey": "abc" },
                "Mixpanel": null,
                "Flurry": false,
                "Segment.io": { "apiKey": "xyz" }
            }
        }))
        .unwrap();

        assert!(settings.settings_for(BackendId::Amplitude).is_some());
        assert!(settings.settings_for(BackendId::Mixpanel).is_none());
        assert!(settings.settings_for(BackendId::Flurry).is_none());
        assert!(settings.settings_for(BackendId::Bugsnag).is_none());
        assert_eq!(settings.enabled(), vec![BackendId::Amplitude]);
    }

    #[test]
    fn test_require_str() {
        let settings = BackendSettings(json!({ "apiKey": "abc", "blank": " " }));
        assert_eq!(
            settings.require_str(BackendId::Amplitude, "apiKey").unwrap(),
            "abc"
        );
        assert!(settings.require_str(BackendId::Amplitude, "blank").is_err());

        let err = settings
            .require_str(BackendId::Amplitude, "secret")
            .unwrap_err();
        assert!(err.to_string().contains("missing 'secret'"));

        let not_object = BackendSettings(json!("abc"));
        assert!(not_object.require_str(BackendId::Amplitude, "apiKey").is_err());
    }
}

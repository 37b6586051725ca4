//! CachedSettingsClient - cross-launch settings cache
//!
//! The first launch fetches from the wrapped client and persists the document;
//! later launches are served from disk without a round-trip.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use config_loader::ConfigFormat;
use contracts::{ContractError, ProjectSettings};
use tracing::{debug, info, instrument, warn};

use crate::client::SettingsClient;
use crate::parser::{parse_settings, to_json};

/// Settings client decorator persisting the last fetched document
pub struct CachedSettingsClient {
    inner: Arc<dyn SettingsClient>,
    path: PathBuf,
}

impl CachedSettingsClient {
    pub fn new(inner: Arc<dyn SettingsClient>, path: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached document, if present and readable
    fn read_cache(&self) -> Option<ProjectSettings> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        match parse_settings(&content, ConfigFormat::Json) {
            Ok(settings) => Some(settings),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring corrupt settings cache");
                None
            }
        }
    }

    fn write_cache(&self, settings: &ProjectSettings) -> Result<(), ContractError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, to_json(settings)?)?;
        Ok(())
    }
}

impl SettingsClient for CachedSettingsClient {
    #[instrument(name = "cached_settings_fetch", skip(self), fields(cache = %self.path.display()))]
    fn fetch(&self) -> Result<ProjectSettings, ContractError> {
        if let Some(settings) = self.read_cache() {
            debug!("settings served from cache");
            return Ok(settings);
        }

        let settings = self.inner.fetch()?;
        match self.write_cache(&settings) {
            Ok(()) => info!("settings cached"),
            Err(e) => warn!(error = %e, "failed to write settings cache"),
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_client::ScriptedSettingsClient;
    use contracts::BackendId;
    use serde_json::json;

    fn amplitude_settings() -> ProjectSettings {
        ProjectSettings::default().with_backend(BackendId::Amplitude, json!({ "apiKey": "a" }))
    }

    #[test]
    fn test_second_launch_served_from_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("nested").join("settings.json");

        let first = Arc::new(ScriptedSettingsClient::new(vec![Ok(amplitude_settings())]));
        let client = CachedSettingsClient::new(first.clone(), &cache_path);
        assert_eq!(client.fetch().unwrap(), amplitude_settings());
        assert_eq!(first.attempts(), 1);
        assert!(cache_path.exists());

        // Next launch: inner client would fail, cache answers instead
        let second = Arc::new(ScriptedSettingsClient::always_failing());
        let client = CachedSettingsClient::new(second.clone(), &cache_path);
        assert_eq!(client.fetch().unwrap(), amplitude_settings());
        assert_eq!(second.attempts(), 0);
    }

    #[test]
    fn test_corrupt_cache_is_refetched() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("settings.json");
        std::fs::write(&cache_path, "{ broken").unwrap();

        let inner = Arc::new(ScriptedSettingsClient::new(vec![Ok(amplitude_settings())]));
        let client = CachedSettingsClient::new(inner.clone(), &cache_path);
        assert_eq!(client.fetch().unwrap(), amplitude_settings());
        assert_eq!(inner.attempts(), 1);
    }

    #[test]
    fn test_fetch_failure_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("settings.json");

        let inner = Arc::new(ScriptedSettingsClient::always_failing());
        let client = CachedSettingsClient::new(inner, &cache_path);
        assert!(client.fetch().is_err());
        assert!(!cache_path.exists());
    }
}

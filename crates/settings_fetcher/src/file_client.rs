//! FileSettingsClient - reads the settings document from disk
//!
//! Stands in for the HTTP transport in local runs: every `fetch` re-reads the
//! file, so an operator can fix a broken document while the fetcher retries.

use std::path::{Path, PathBuf};

use config_loader::ConfigFormat;
use contracts::{ContractError, ProjectSettings};
use tracing::{debug, instrument};

use crate::client::SettingsClient;
use crate::parser::parse_settings;

/// Settings client backed by a JSON or TOML file
#[derive(Debug, Clone)]
pub struct FileSettingsClient {
    path: PathBuf,
    format: ConfigFormat,
}

impl FileSettingsClient {
    /// Create a client, inferring the format from the extension (JSON by default)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ConfigFormat::from_extension)
            .unwrap_or(ConfigFormat::Json);
        Self { path, format }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsClient for FileSettingsClient {
    #[instrument(name = "file_settings_fetch", skip(self), fields(path = %self.path.display()))]
    fn fetch(&self) -> Result<ProjectSettings, ContractError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| ContractError::Network {
            message: format!("cannot read {}", self.path.display()),
            source: Some(Box::new(e)),
        })?;
        let settings = parse_settings(&content, self.format)?;
        debug!(enabled = settings.enabled().len(), "settings document read");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::BackendId;
    use std::io::Write;

    #[test]
    fn test_reads_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(br#"{ "integrations": { "Flurry": { "apiKey": "f" } } }"#)
            .unwrap();

        let client = FileSettingsClient::new(file.path());
        let settings = client.fetch().unwrap();
        assert_eq!(settings.enabled(), vec![BackendId::Flurry]);
    }

    #[test]
    fn test_missing_file_is_network_error() {
        let dir = tempfile::tempdir().unwrap();
        let client = FileSettingsClient::new(dir.path().join("absent.json"));
        let err = client.fetch().unwrap_err();
        assert!(matches!(err, ContractError::Network { .. }));
    }
}

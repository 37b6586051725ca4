//! Settings document parsing
//!
//! Reuses the collector's document parser and reports failures as settings
//! errors rather than collector config errors.

use config_loader::{parse_document, ConfigFormat};
use contracts::{ContractError, ProjectSettings};

/// Parse a settings document
pub fn parse_settings(content: &str, format: ConfigFormat) -> Result<ProjectSettings, ContractError> {
    parse_document(content, format).map_err(|e| match e {
        ContractError::ConfigParse { message, source } => {
            ContractError::SettingsParse { message, source }
        }
        other => other,
    })
}

/// Serialize a settings document as JSON (cache format)
pub fn to_json(settings: &ProjectSettings) -> Result<String, ContractError> {
    serde_json::to_string_pretty(settings)
        .map_err(|e| ContractError::settings_parse(format!("JSON serialize error: {e}")))
}

//! `validate` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::{CollectorConfig, ProjectSettings};
use integration_registry::{linked_backends, ActivationOutcome, IntegrationRegistry, LogBackendFactory};
use settings_fetcher::{FileSettingsClient, SettingsClient};

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    settings_source: String,
    enabled: Vec<String>,
    would_activate: Vec<String>,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();
    let invalid = |error: String| ValidationResult {
        valid: false,
        config_path: config_path.clone(),
        error: Some(error),
        warnings: None,
        summary: None,
    };

    if !args.config.exists() {
        return invalid(format!("File not found: {}", args.config.display()));
    }

    let config = match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => config,
        Err(e) => return invalid(e.to_string()),
    };

    // 单次读取，不重试
    let settings = match FileSettingsClient::new(&config.settings.source).fetch() {
        Ok(settings) => settings,
        Err(e) => return invalid(format!("settings document: {e}")),
    };

    let registry = IntegrationRegistry::activate(linked_backends(), &settings, &LogBackendFactory);
    let warnings = collect_warnings(&config, &settings, &registry);

    ValidationResult {
        valid: true,
        config_path: config_path.clone(),
        error: None,
        warnings: if warnings.is_empty() {
            None
        } else {
            Some(warnings)
        },
        summary: Some(ConfigSummary {
            version: format!("{:?}", config.version),
            settings_source: config.settings.source.display().to_string(),
            enabled: settings
                .enabled()
                .into_iter()
                .map(|id| id.settings_key().to_string())
                .collect(),
            would_activate: registry
                .ids()
                .into_iter()
                .map(|id| id.settings_key().to_string())
                .collect(),
        }),
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(
    config: &CollectorConfig,
    settings: &ProjectSettings,
    registry: &IntegrationRegistry,
) -> Vec<String> {
    let mut warnings = Vec::new();

    if settings.enabled().is_empty() {
        warnings.push("No backend enabled - every event will be discarded".to_string());
    }

    for (id, outcome) in registry.report() {
        match outcome {
            ActivationOutcome::NotLinked if settings.settings_for(*id).is_some() => {
                warnings.push(format!("'{}' is enabled but not linked into this binary", id));
            }
            ActivationOutcome::Failed(reason) => {
                warnings.push(format!("'{}' would fail to activate: {}", id, reason));
            }
            _ => {}
        }
    }

    if config.retry.max_attempts.is_some() {
        warnings.push(
            "retry.max_attempts is set - events are discarded if settings stay unreachable"
                .to_string(),
        );
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Settings: {}", summary.settings_source);
            println!("  Enabled: {}", summary.enabled.join(", "));
            println!("  Would activate: {}", summary.would_activate.join(", "));
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

//! 配置校验模块
//!
//! 校验规则：
//! - settings.source 非空
//! - retry.first_delay_ms > 0 且 <= retry.max_delay_ms
//! - retry.factor >= 1.0 且为有限值
//! - retry.max_attempts 若设置则 > 0

use contracts::{CollectorConfig, ContractError};

/// 校验 CollectorConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &CollectorConfig) -> Result<(), ContractError> {
    validate_settings_source(config)?;
    validate_retry(config)?;
    Ok(())
}

/// 校验 settings 来源
fn validate_settings_source(config: &CollectorConfig) -> Result<(), ContractError> {
    if config.settings.source.as_os_str().is_empty() {
        return Err(ContractError::config_validation(
            "settings.source",
            "settings source cannot be empty",
        ));
    }
    if let Some(cache) = &config.settings.cache_path {
        if cache == &config.settings.source {
            return Err(ContractError::config_validation(
                "settings.cache_path",
                "cache_path must differ from settings.source",
            ));
        }
    }
    Ok(())
}

/// 校验重试策略
fn validate_retry(config: &CollectorConfig) -> Result<(), ContractError> {
    let retry = &config.retry;

    if retry.first_delay_ms == 0 {
        return Err(ContractError::config_validation(
            "retry.first_delay_ms",
            "first_delay_ms must be > 0",
        ));
    }

    if retry.first_delay_ms > retry.max_delay_ms {
        return Err(ContractError::config_validation(
            "retry.first_delay_ms / retry.max_delay_ms",
            format!(
                "first_delay_ms ({}) must be <= max_delay_ms ({})",
                retry.first_delay_ms, retry.max_delay_ms
            ),
        ));
    }

    if !retry.factor.is_finite() || retry.factor < 1.0 {
        return Err(ContractError::config_validation(
            "retry.factor",
            format!("factor must be >= 1.0, got {}", retry.factor),
        ));
    }

    if retry.max_attempts == Some(0) {
        return Err(ContractError::config_validation(
            "retry.max_attempts",
            "max_attempts must be > 0 (omit it to retry until success)",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{
        ConfigVersion, DispatcherTuning, RetryConfig, SettingsSourceConfig,
    };

    fn minimal_config() -> CollectorConfig {
        CollectorConfig {
            version: ConfigVersion::V1,
            settings: SettingsSourceConfig {
                source: "settings.json".into(),
                cache_path: None,
            },
            retry: RetryConfig::default(),
            dispatcher: DispatcherTuning::default(),
        }
    }

    #[test]
    fn test_minimal_config_valid() {
        assert!(validate(&minimal_config()).is_ok());
    }

    #[test]
    fn test_empty_source() {
        let mut config = minimal_config();
        config.settings.source = "".into();
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("cannot be empty"), "got: {err}");
    }

    #[test]
    fn test_cache_same_as_source() {
        let mut config = minimal_config();
        config.settings.cache_path = Some("settings.json".into());
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("must differ"), "got: {err}");
    }

    #[test]
    fn test_zero_first_delay() {
        let mut config = minimal_config();
        config.retry.first_delay_ms = 0;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("first_delay_ms must be > 0"), "got: {err}");
    }

    #[test]
    fn test_invalid_delay_range() {
        let mut config = minimal_config();
        config.retry.first_delay_ms = 5_000;
        config.retry.max_delay_ms = 100;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("must be <= max_delay_ms"), "got: {err}");
    }

    #[test]
    fn test_shrinking_factor() {
        let mut config = minimal_config();
        config.retry.factor = 0.5;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("factor must be >= 1.0"), "got: {err}");
    }

    #[test]
    fn test_zero_max_attempts() {
        let mut config = minimal_config();
        config.retry.max_attempts = Some(0);
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("max_attempts"), "got: {err}");
    }
}

//! Layered error definitions
//!
//! Categorized by source: config / settings transport / backend construction / backend dispatch

use thiserror::Error;

use crate::BackendId;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Collector Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Settings Errors =====
    /// Settings transport failure, retried by the fetcher
    #[error("network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Settings document could not be decoded
    #[error("settings parse error: {message}")]
    SettingsParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ===== Backend Errors =====
    /// Backend settings invalid or construction failed
    #[error("backend '{backend}' config error: {message}")]
    Config { backend: BackendId, message: String },

    /// Backend failed while handling one event
    #[error("backend '{backend}' failed handling {event}: {message}")]
    BackendDispatch {
        backend: BackendId,
        event: String,
        message: String,
    },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Create settings parse error
    pub fn settings_parse(message: impl Into<String>) -> Self {
        Self::SettingsParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create backend config error
    pub fn config(backend: BackendId, message: impl Into<String>) -> Self {
        Self::Config {
            backend,
            message: message.into(),
        }
    }

    /// Create backend dispatch error
    pub fn backend_dispatch(
        backend: BackendId,
        event: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::BackendDispatch {
            backend,
            event: event.into(),
            message: message.into(),
        }
    }
}

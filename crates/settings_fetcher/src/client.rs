//! Settings client abstraction
//!
//! Defines the blocking transport used to obtain the project settings,
//! supporting file-backed, cached and mock implementations.

use contracts::{ContractError, ProjectSettings};

/// Blocking settings transport.
///
/// Called off the caller's thread by [`crate::SettingsFetcher`]. Any error is
/// treated as a transport failure and retried according to the fetcher's
/// policy.
pub trait SettingsClient: Send + Sync {
    /// Fetch the project settings once
    fn fetch(&self) -> Result<ProjectSettings, ContractError>;
}

/// Client that always returns the same document.
#[derive(Debug, Clone)]
pub struct StaticSettingsClient {
    settings: ProjectSettings,
}

impl StaticSettingsClient {
    pub fn new(settings: ProjectSettings) -> Self {
        Self { settings }
    }
}

impl SettingsClient for StaticSettingsClient {
    fn fetch(&self) -> Result<ProjectSettings, ContractError> {
        Ok(self.settings.clone())
    }
}

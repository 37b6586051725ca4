//! Backend factory abstraction
//!
//! Constructs vendor adapters from their project settings. Real vendor
//! factories live with their adapters; this crate ships a log-backed factory
//! and a mock.

use contracts::{BackendId, BackendSettings, ContractError, Integration};

/// Backend factory trait
pub trait BackendFactory: Send + Sync {
    /// Construct the adapter for `id`
    ///
    /// # Errors
    /// [`ContractError::Config`] when the settings are invalid or the vendor
    /// SDK refuses to initialize.
    fn construct(
        &self,
        id: BackendId,
        settings: &BackendSettings,
    ) -> Result<Box<dyn Integration>, ContractError>;
}

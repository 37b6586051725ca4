//! Settings fetcher error types

use contracts::ContractError;
use thiserror::Error;

/// Terminal outcome of a fetch-with-retry run
#[derive(Debug, Error)]
pub enum FetchError {
    /// Cancelled at a retry boundary or while an attempt was in flight
    #[error("settings fetch cancelled")]
    Cancelled,

    /// Attempt cap reached
    #[error("settings fetch gave up after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: ContractError,
    },
}

/// Result alias
pub type Result<T> = std::result::Result<T, FetchError>;

//! Dispatcher error types

use thiserror::Error;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Coordinator has stopped, nothing more is accepted
    #[error("dispatcher is shut down")]
    Closed,
}

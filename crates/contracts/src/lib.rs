//! # Contracts
//!
//! Frozen interface contracts shared by every crate of the collector.
//! Business crates depend only on this crate, never on each other's internals.
//!
//! ## Bootstrap model
//! - `AvailableBackends` is probed once, `ProjectSettings` is fetched once
//! - an activated backend is an [`Integration`] trait object owned by the registry
//! - `EventRecord`s are owned; lifecycle notifications are borrowed and never queued

mod available;
mod backend_id;
mod collector_config;
mod error;
mod event;
mod integration;
mod settings;

pub use available::AvailableBackends;
pub use backend_id::BackendId;
pub use collector_config::*;
pub use error::*;
pub use event::*;
pub use integration::Integration;
pub use settings::{BackendSettings, ProjectSettings};

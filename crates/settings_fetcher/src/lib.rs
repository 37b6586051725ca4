//! # Settings Fetcher
//!
//! Project settings acquisition.
//!
//! Responsibilities:
//! - Abstract the blocking settings transport (`SettingsClient`)
//! - Retry failed fetches with exponential backoff and cancellation
//! - Cache the fetched document across launches
//! - Provide file-backed and mock clients

pub mod backoff;
pub mod cache;
pub mod client;
pub mod error;
pub mod fetcher;
pub mod file_client;
pub mod mock_client;
pub mod parser;

pub use backoff::{BackoffPolicy, RetryPolicy};
pub use cache::CachedSettingsClient;
pub use client::{SettingsClient, StaticSettingsClient};
pub use contracts::ProjectSettings;
pub use error::{FetchError, Result};
pub use fetcher::SettingsFetcher;
pub use file_client::FileSettingsClient;
pub use mock_client::{ScriptedSettingsClient, SettingsGate};
pub use parser::parse_settings;

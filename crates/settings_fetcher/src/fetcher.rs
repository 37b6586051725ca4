//! SettingsFetcher - fetch-with-retry wrapper
//!
//! Runs each blocking attempt on the blocking pool, backs off between failed
//! attempts and honours cancellation at every retry boundary and while an
//! attempt is in flight.

use std::sync::Arc;

use contracts::{ContractError, ProjectSettings};
use observability::metrics::record_settings_fetch;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::backoff::RetryPolicy;
use crate::client::SettingsClient;
use crate::error::{FetchError, Result};

/// Retrying front of a [`SettingsClient`]
pub struct SettingsFetcher {
    client: Arc<dyn SettingsClient>,
    policy: RetryPolicy,
    cancel: CancellationToken,
}

impl SettingsFetcher {
    pub fn new(client: Arc<dyn SettingsClient>, policy: RetryPolicy) -> Self {
        Self {
            client,
            policy,
            cancel: CancellationToken::new(),
        }
    }

    /// Stop retrying once `cancel` fires
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetch the project settings, retrying failed attempts.
    ///
    /// # Errors
    /// - [`FetchError::Cancelled`] when the token fires
    /// - [`FetchError::Exhausted`] when a bounded policy runs out of attempts
    #[instrument(name = "settings_fetcher_fetch", skip(self), fields(max_attempts = ?self.policy.max_attempts))]
    pub async fn fetch(&self) -> Result<ProjectSettings> {
        let mut failures: u32 = 0;

        loop {
            if self.cancel.is_cancelled() {
                return Err(FetchError::Cancelled);
            }

            let result = tokio::select! {
                _ = self.cancel.cancelled() => return Err(FetchError::Cancelled),
                result = self.attempt() => result,
            };

            match result {
                Ok(settings) => {
                    record_settings_fetch(true);
                    info!(
                        attempts = failures + 1,
                        enabled = settings.enabled().len(),
                        "settings fetched"
                    );
                    return Ok(settings);
                }
                Err(e) => {
                    record_settings_fetch(false);
                    failures += 1;

                    if self.policy.is_exhausted(failures) {
                        warn!(attempts = failures, error = %e, "settings fetch exhausted");
                        return Err(FetchError::Exhausted {
                            attempts: failures,
                            last: e,
                        });
                    }

                    let delay = self.policy.backoff.next(failures - 1);
                    warn!(
                        attempt = failures,
                        error = %e,
                        delay_ms = delay.as_millis() as u64,
                        "failed to fetch settings, retrying"
                    );

                    tokio::select! {
                        _ = self.cancel.cancelled() => return Err(FetchError::Cancelled),
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }
    }

    /// One blocking attempt, off the async workers
    async fn attempt(&self) -> std::result::Result<ProjectSettings, ContractError> {
        let client = Arc::clone(&self.client);
        tokio::task::spawn_blocking(move || client.fetch())
            .await
            .unwrap_or_else(|e| {
                Err(ContractError::network(format!(
                    "settings fetch task failed: {e}"
                )))
            })
    }
}

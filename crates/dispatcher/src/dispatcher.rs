//! Dispatcher - wiring of bootstrap worker, coordinator and handles

use std::sync::Arc;
use std::time::Duration;

use contracts::CollectorConfig;
use integration_registry::{BackendFactory, CapabilityProber, MarkerResolver};
use settings_fetcher::{RetryPolicy, SettingsClient, SettingsFetcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{error, info, instrument, warn};

use crate::bootstrap::{Bootstrap, ProbeFn};
use crate::coordinator::Coordinator;
use crate::handle::{DispatcherHandle, Shared};
use crate::metrics::StatsSnapshot;

const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

/// Builder for creating a Dispatcher
pub struct DispatcherBuilder {
    client: Arc<dyn SettingsClient>,
    factory: Arc<dyn BackendFactory>,
    policy: RetryPolicy,
    probe: ProbeFn,
    shutdown_timeout: Duration,
}

impl DispatcherBuilder {
    /// Defaults: linked backends, default backoff retried until success
    pub fn new(client: Arc<dyn SettingsClient>, factory: Arc<dyn BackendFactory>) -> Self {
        Self {
            client,
            factory,
            policy: RetryPolicy::default(),
            probe: Box::new(|| CapabilityProber::linked().probe()),
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }

    /// Builder seeded from the collector configuration
    pub fn from_config(
        config: &CollectorConfig,
        client: Arc<dyn SettingsClient>,
        factory: Arc<dyn BackendFactory>,
    ) -> Self {
        Self::new(client, factory)
            .retry_policy(RetryPolicy::from(&config.retry))
            .shutdown_timeout(Duration::from_millis(config.dispatcher.shutdown_timeout_ms))
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the linkage probe
    pub fn prober<R>(mut self, prober: CapabilityProber<R>) -> Self
    where
        R: MarkerResolver + Send + 'static,
    {
        self.probe = Box::new(move || prober.probe());
        self
    }

    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Spawn the coordinator and the bootstrap worker
    ///
    /// Must be called inside a tokio runtime. Returns immediately; the
    /// dispatcher starts out buffering.
    #[instrument(name = "dispatcher_start", skip(self), fields(policy = ?self.policy))]
    pub fn start(self) -> Dispatcher {
        let cancel = CancellationToken::new();
        let shared = Arc::new(Shared::new());
        let (tx, rx) = mpsc::unbounded_channel();

        let coordinator =
            tokio::spawn(Coordinator::new(rx, Arc::clone(&shared), cancel.clone()).run());

        let bootstrap = Bootstrap {
            probe: self.probe,
            fetcher: SettingsFetcher::new(self.client, self.policy)
                .with_cancellation(cancel.child_token()),
            factory: self.factory,
            shared: Arc::clone(&shared),
            tx: tx.clone(),
        };
        let bootstrap = tokio::spawn(bootstrap.run());

        info!("dispatcher started, buffering until activation");

        Dispatcher {
            handle: DispatcherHandle::new(tx, shared),
            cancel: cancel.clone(),
            _cancel_on_drop: cancel.drop_guard(),
            coordinator,
            bootstrap,
            shutdown_timeout: self.shutdown_timeout,
        }
    }
}

/// A running dispatcher
///
/// Dropping it cancels bootstrap and stops the coordinator; prefer
/// [`Dispatcher::shutdown`] to wait for both.
pub struct Dispatcher {
    handle: DispatcherHandle,
    cancel: CancellationToken,
    _cancel_on_drop: DropGuard,
    coordinator: JoinHandle<()>,
    bootstrap: JoinHandle<()>,
    shutdown_timeout: Duration,
}

impl Dispatcher {
    pub fn handle(&self) -> DispatcherHandle {
        self.handle.clone()
    }

    /// Cancel bootstrap, process what is already queued, stop.
    ///
    /// Events still buffered at this point are discarded and counted.
    #[instrument(name = "dispatcher_shutdown", skip(self))]
    pub async fn shutdown(self) -> StatsSnapshot {
        let Dispatcher {
            handle,
            cancel,
            _cancel_on_drop,
            mut coordinator,
            mut bootstrap,
            shutdown_timeout,
        } = self;

        cancel.cancel();

        let joined = tokio::time::timeout(shutdown_timeout, async {
            if let Err(e) = (&mut bootstrap).await {
                error!(error = ?e, "bootstrap task panicked");
            }
            if let Err(e) = (&mut coordinator).await {
                error!(error = ?e, "coordinator task panicked");
            }
        })
        .await;

        if joined.is_err() {
            warn!(timeout = ?shutdown_timeout, "dispatcher shutdown timed out, aborting tasks");
            bootstrap.abort();
            coordinator.abort();
        }

        let stats = handle.stats();
        info!(stats = ?stats, "dispatcher shutdown complete");
        stats
    }
}

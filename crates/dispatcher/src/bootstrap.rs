//! Bootstrap worker: probe -> fetch (retry) -> activate
//!
//! Runs once per dispatcher and reports the finished registry to the
//! coordinator as a message.

use std::sync::Arc;

use contracts::AvailableBackends;
use integration_registry::{BackendFactory, IntegrationRegistry};
use settings_fetcher::{FetchError, SettingsFetcher};
use tokio::sync::mpsc;
use tracing::{error, info, instrument, warn};

use crate::coordinator::Command;
use crate::handle::Shared;

pub(crate) type ProbeFn = Box<dyn FnOnce() -> AvailableBackends + Send>;

pub(crate) struct Bootstrap {
    pub(crate) probe: ProbeFn,
    pub(crate) fetcher: SettingsFetcher,
    pub(crate) factory: Arc<dyn BackendFactory>,
    pub(crate) shared: Arc<Shared>,
    pub(crate) tx: mpsc::UnboundedSender<Command>,
}

impl Bootstrap {
    #[instrument(name = "dispatcher_bootstrap", skip(self))]
    pub(crate) async fn run(self) {
        let available = (self.probe)();
        let _ = self.shared.available.set(available.clone());

        let registry = match self.fetcher.fetch().await {
            Ok(settings) => {
                let factory = Arc::clone(&self.factory);
                // 构造 vendor adapter 可能阻塞
                let activation = tokio::task::spawn_blocking(move || {
                    IntegrationRegistry::activate(&available, &settings, factory.as_ref())
                })
                .await;
                match activation {
                    Ok(registry) => registry,
                    Err(e) => {
                        error!(error = %e, "activation panicked, continuing with no backends");
                        IntegrationRegistry::empty()
                    }
                }
            }
            Err(FetchError::Cancelled) => {
                info!("bootstrap cancelled before activation");
                return;
            }
            Err(e) => {
                error!(error = %e, "project settings unavailable, continuing with no backends");
                IntegrationRegistry::empty()
            }
        };

        if self.tx.send(Command::Activated(Arc::new(registry))).is_err() {
            warn!("coordinator stopped before activation completed");
        }
    }
}

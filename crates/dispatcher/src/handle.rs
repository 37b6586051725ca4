//! DispatcherHandle - cloneable producer side of the dispatcher

use std::sync::{Arc, OnceLock};

use contracts::{AvailableBackends, EventRecord, LifecycleContext, LifecycleKind};
use integration_registry::IntegrationRegistry;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, instrument};

use crate::coordinator::Command;
use crate::error::DispatcherError;
use crate::fanout::fan_out_lifecycle;
use crate::metrics::{DispatcherStats, StatsSnapshot};

/// Dispatcher phase as seen from outside
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Events are queued until activation completes
    Buffering,
    /// Replay has finished, events go straight to the activated backends
    ///
    /// Backends are reachable for lifecycle notifications slightly earlier,
    /// from the moment replay starts.
    Live,
    /// Coordinator has exited
    Stopped,
}

/// State shared by handles, the coordinator and the bootstrap worker
#[derive(Debug)]
pub(crate) struct Shared {
    /// Published once by the coordinator after replay
    pub(crate) registry: OnceLock<Arc<IntegrationRegistry>>,
    /// Published once by the bootstrap worker after probing
    pub(crate) available: OnceLock<AvailableBackends>,
    pub(crate) phase: watch::Sender<Phase>,
    pub(crate) stats: DispatcherStats,
}

impl Shared {
    pub(crate) fn new() -> Self {
        let (phase, _) = watch::channel(Phase::Buffering);
        Self {
            registry: OnceLock::new(),
            available: OnceLock::new(),
            phase,
            stats: DispatcherStats::new(),
        }
    }
}

/// Handle to a running dispatcher
///
/// Every method returns without waiting on bootstrap, except the explicitly
/// async ones.
#[derive(Debug, Clone)]
pub struct DispatcherHandle {
    tx: mpsc::UnboundedSender<Command>,
    shared: Arc<Shared>,
}

impl DispatcherHandle {
    pub(crate) fn new(tx: mpsc::UnboundedSender<Command>, shared: Arc<Shared>) -> Self {
        Self { tx, shared }
    }

    /// Hand an event to the coordinator
    ///
    /// Never blocks. Events from one handle are delivered in submission order.
    pub fn submit(&self, event: EventRecord) -> Result<(), DispatcherError> {
        self.tx
            .send(Command::Event(event))
            .map_err(|_| DispatcherError::Closed)?;
        self.shared.stats.inc_submitted();
        Ok(())
    }

    /// Forward a lifecycle notification on the calling thread
    ///
    /// Not buffered: before activation the notification is dropped. Returns
    /// how many backends accepted it.
    #[instrument(name = "dispatcher_notify_lifecycle", skip(self, context), fields(kind = %kind))]
    pub fn notify_lifecycle(&self, kind: LifecycleKind, context: &LifecycleContext<'_>) -> usize {
        match self.shared.registry.get() {
            Some(registry) => {
                self.shared.stats.inc_lifecycle_forwarded();
                fan_out_lifecycle(registry, kind, context, &self.shared.stats)
            }
            None => {
                self.shared.stats.inc_lifecycle_dropped();
                debug!(component = context.component, "no backend activated yet, lifecycle dropped");
                0
            }
        }
    }

    /// Wait until everything submitted before this call has been processed
    ///
    /// While buffering, "processed" means queued.
    pub async fn flush(&self) -> Result<(), DispatcherError> {
        let (done_tx, done_rx) = oneshot::channel();
        self.tx
            .send(Command::Flush(done_tx))
            .map_err(|_| DispatcherError::Closed)?;
        done_rx.await.map_err(|_| DispatcherError::Closed)
    }

    /// Wait for the transition to live
    ///
    /// Fails with [`DispatcherError::Closed`] if the dispatcher stops first.
    pub async fn wait_until_live(&self) -> Result<(), DispatcherError> {
        let mut rx = self.shared.phase.subscribe();
        let phase = *rx
            .wait_for(|phase| *phase != Phase::Buffering)
            .await
            .map_err(|_| DispatcherError::Closed)?;
        match phase {
            Phase::Live => Ok(()),
            _ if self.shared.registry.get().is_some() => Ok(()),
            _ => Err(DispatcherError::Closed),
        }
    }

    pub fn phase(&self) -> Phase {
        *self.shared.phase.borrow()
    }

    /// Backends linked into this build, once probed
    pub fn available(&self) -> Option<&AvailableBackends> {
        self.shared.available.get()
    }

    /// Activated backends, once live
    pub fn registry(&self) -> Option<Arc<IntegrationRegistry>> {
        self.shared.registry.get().cloned()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.shared.stats.snapshot()
    }
}

//! ActivatedBackend - one constructed adapter plus its delivery bookkeeping

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use contracts::{BackendId, ContractError, EventRecord, Integration, LifecycleContext, LifecycleKind};
use observability::metrics::{record_backend_delivery, record_lifecycle_forwarded};

use crate::metrics::BackendMetrics;

/// Adapter owned by the registry for the life of the process
pub struct ActivatedBackend {
    id: BackendId,
    integration: Box<dyn Integration>,
    metrics: BackendMetrics,
}

impl ActivatedBackend {
    pub fn new(id: BackendId, integration: Box<dyn Integration>) -> Self {
        Self {
            id,
            integration,
            metrics: BackendMetrics::new(),
        }
    }

    pub fn id(&self) -> BackendId {
        self.id
    }

    pub fn metrics(&self) -> &BackendMetrics {
        &self.metrics
    }

    /// Hand one record to the matching capability.
    ///
    /// Errors and panics raised by the adapter are contained here and come
    /// back as [`ContractError::BackendDispatch`].
    pub fn deliver(&self, event: &EventRecord) -> Result<(), ContractError> {
        let integration = self.integration.as_ref();
        let result = self.guarded(event.kind(), || match event {
            EventRecord::Identify(payload) => integration.on_identify(payload),
            EventRecord::Group(payload) => integration.on_group(payload),
            EventRecord::Track(payload) => integration.on_track(payload),
            EventRecord::Alias(payload) => integration.on_alias(payload),
            EventRecord::Screen(payload) => integration.on_screen(payload),
        });

        match &result {
            Ok(()) => self.metrics.inc_delivered_count(),
            Err(_) => self.metrics.inc_failure_count(),
        }
        record_backend_delivery(self.id, result.is_ok());
        result
    }

    /// Forward a lifecycle notification
    pub fn deliver_lifecycle(
        &self,
        kind: LifecycleKind,
        context: &LifecycleContext<'_>,
    ) -> Result<(), ContractError> {
        let integration = self.integration.as_ref();
        let result = self.guarded(kind.as_str(), || integration.on_lifecycle(kind, context));

        match &result {
            Ok(()) => {
                self.metrics.inc_lifecycle_count();
                record_lifecycle_forwarded(kind);
            }
            Err(_) => self.metrics.inc_failure_count(),
        }
        result
    }

    fn guarded<F>(&self, event: &str, call: F) -> Result<(), ContractError>
    where
        F: FnOnce() -> Result<(), ContractError>,
    {
        match panic::catch_unwind(AssertUnwindSafe(call)) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e @ ContractError::BackendDispatch { .. })) => Err(e),
            Ok(Err(e)) => Err(ContractError::backend_dispatch(self.id, event, e.to_string())),
            Err(panic) => Err(ContractError::backend_dispatch(
                self.id,
                event,
                format!("adapter panicked: {}", panic_message(panic.as_ref())),
            )),
        }
    }
}

impl std::fmt::Debug for ActivatedBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivatedBackend")
            .field("id", &self.id)
            .field("metrics", &self.metrics.snapshot())
            .finish()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

//! Fan-out of one event to every activated backend

use contracts::{EventRecord, LifecycleContext, LifecycleKind};
use integration_registry::IntegrationRegistry;
use tracing::warn;

use crate::metrics::DispatcherStats;

/// Deliver `event` to every backend, returns how many accepted it.
///
/// A failing backend is logged and skipped, the others still receive the event.
pub(crate) fn fan_out(
    registry: &IntegrationRegistry,
    event: &EventRecord,
    stats: &DispatcherStats,
) -> usize {
    let mut delivered = 0;
    for backend in registry.backends() {
        match backend.deliver(event) {
            Ok(()) => delivered += 1,
            Err(e) => {
                stats.inc_delivery_failures();
                warn!(
                    backend = %backend.id(),
                    event = event.kind(),
                    error = %e,
                    "backend failed to handle event"
                );
            }
        }
    }
    delivered
}

/// Same isolation rules as [`fan_out`], for lifecycle notifications
pub(crate) fn fan_out_lifecycle(
    registry: &IntegrationRegistry,
    kind: LifecycleKind,
    context: &LifecycleContext<'_>,
    stats: &DispatcherStats,
) -> usize {
    let mut delivered = 0;
    for backend in registry.backends() {
        match backend.deliver_lifecycle(kind, context) {
            Ok(()) => delivered += 1,
            Err(e) => {
                stats.inc_delivery_failures();
                warn!(
                    backend = %backend.id(),
                    kind = %kind,
                    component = context.component,
                    error = %e,
                    "backend failed to handle lifecycle notification"
                );
            }
        }
    }
    delivered
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{AvailableBackends, BackendId, ProjectSettings};
    use integration_registry::{MockBackendFactory, MockConfig, Recorder};
    use serde_json::json;

    #[test]
    fn test_failing_backend_does_not_block_others() {
        let recorder = Recorder::new();
        let factory = MockBackendFactory::with_config(
            recorder.clone(),
            MockConfig {
                fail_dispatch: vec![BackendId::Bugsnag],
                panic_dispatch: vec![BackendId::Countly],
                ..Default::default()
            },
        );
        let settings = ProjectSettings::default()
            .with_backend(BackendId::Amplitude, json!({ "apiKey": "a" }))
            .with_backend(BackendId::Bugsnag, json!({ "apiKey": "b" }))
            .with_backend(BackendId::Countly, json!({ "appKey": "c" }));
        let available: AvailableBackends = BackendId::ALL.into_iter().collect();
        let registry = IntegrationRegistry::activate(&available, &settings, &factory);
        let stats = DispatcherStats::new();

        let event = EventRecord::track("u1", "Purchased");
        assert_eq!(fan_out(&registry, &event, &stats), 1);
        assert_eq!(recorder.events_for(BackendId::Amplitude), vec![event]);
        assert_eq!(stats.snapshot().delivery_failures, 2);

        let ctx = LifecycleContext::new("Checkout");
        assert_eq!(
            fan_out_lifecycle(&registry, LifecycleKind::Started, &ctx, &stats),
            1
        );
        assert_eq!(
            recorder.lifecycle_for(BackendId::Amplitude),
            vec![LifecycleKind::Started]
        );
    }
}

//! Capability Prober
//!
//! Decides which backends are linked into the running binary. Vendor adapters
//! are linked through cargo features, so the default resolver is a pure
//! function of the build.

use std::sync::OnceLock;

use contracts::{AvailableBackends, BackendId};
use tracing::{debug, info, instrument};

/// Resolves a backend's linkage marker
pub trait MarkerResolver {
    /// Whether the marker of `id` is present in this runtime image
    fn resolve(&self, id: BackendId) -> bool;
}

impl<F> MarkerResolver for F
where
    F: Fn(BackendId) -> bool,
{
    fn resolve(&self, id: BackendId) -> bool {
        self(id)
    }
}

/// Resolver backed by the cargo features this crate was built with
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkedFeatures;

impl MarkerResolver for LinkedFeatures {
    fn resolve(&self, id: BackendId) -> bool {
        match id {
            BackendId::Amplitude => cfg!(feature = "amplitude"),
            BackendId::Bugsnag => cfg!(feature = "bugsnag"),
            BackendId::Countly => cfg!(feature = "countly"),
            BackendId::Crittercism => cfg!(feature = "crittercism"),
            BackendId::Flurry => cfg!(feature = "flurry"),
            BackendId::GoogleAnalytics => cfg!(feature = "google-analytics"),
            BackendId::Localytics => cfg!(feature = "localytics"),
            BackendId::Mixpanel => cfg!(feature = "mixpanel"),
            BackendId::Quantcast => cfg!(feature = "quantcast"),
            BackendId::Tapstream => cfg!(feature = "tapstream"),
        }
    }
}

/// Probes every known backend against a [`MarkerResolver`]
#[derive(Debug, Clone, Default)]
pub struct CapabilityProber<R = LinkedFeatures> {
    resolver: R,
}

impl CapabilityProber<LinkedFeatures> {
    /// Prober for the backends linked into this build
    pub fn linked() -> Self {
        Self {
            resolver: LinkedFeatures,
        }
    }
}

impl<R: MarkerResolver> CapabilityProber<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    /// Resolve every known backend; unresolved markers are omitted, not errors.
    #[instrument(name = "capability_probe", skip(self))]
    pub fn probe(&self) -> AvailableBackends {
        let available: AvailableBackends = BackendId::ALL
            .into_iter()
            .filter(|id| {
                let linked = self.resolver.resolve(*id);
                if !linked {
                    debug!(backend = %id, marker = id.marker(), "backend not bundled");
                }
                linked
            })
            .collect();

        info!(
            available = available.len(),
            missing = available.missing().len(),
            "capability probe completed"
        );
        available
    }
}

/// Backends linked into this build, probed once per process
pub fn linked_backends() -> &'static AvailableBackends {
    static LINKED: OnceLock<AvailableBackends> = OnceLock::new();
    LINKED.get_or_init(|| CapabilityProber::linked().probe())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_omits_unresolved() {
        let prober = CapabilityProber::new(|id: BackendId| {
            matches!(id, BackendId::Amplitude | BackendId::Flurry)
        });
        let available = prober.probe();
        assert_eq!(
            available.iter().collect::<Vec<_>>(),
            vec![BackendId::Amplitude, BackendId::Flurry]
        );
    }

    #[test]
    fn test_probe_is_idempotent() {
        let prober = CapabilityProber::new(|id: BackendId| id == BackendId::Mixpanel);
        assert_eq!(prober.probe(), prober.probe());

        let first = linked_backends();
        let second = linked_backends();
        assert!(std::ptr::eq(first, second));
        assert_eq!(*first, CapabilityProber::linked().probe());
    }

    #[test]
    fn test_nothing_linked() {
        let prober = CapabilityProber::new(|_: BackendId| false);
        assert!(prober.probe().is_empty());
    }
}

//! # Integration Registry
//!
//! Backend activation module.
//!
//! Responsibilities:
//! - Probe which backends are linked into the binary (`CapabilityProber`)
//! - Construct adapters for backends both linked and enabled (`IntegrationRegistry`)
//! - Contain adapter failures at the delivery boundary (`ActivatedBackend`)
//! - Provide log-backed and mock factories
//!
//! ## Feature Flags
//!
//! One feature per vendor adapter (`amplitude`, `mixpanel`, ...), plus
//! `all-backends`. Probing reports exactly the enabled features.

pub mod backend;
pub mod factory;
pub mod log_integration;
pub mod metrics;
pub mod mock_factory;
pub mod prober;
pub mod registry;

pub use backend::ActivatedBackend;
pub use contracts::{AvailableBackends, BackendId, Integration};
pub use factory::BackendFactory;
pub use log_integration::{LogBackendFactory, LogIntegration};
pub use metrics::{BackendMetrics, BackendMetricsSnapshot};
pub use mock_factory::{Delivery, MockBackendFactory, MockConfig, Recorder};
pub use prober::{linked_backends, CapabilityProber, LinkedFeatures, MarkerResolver};
pub use registry::{ActivationOutcome, IntegrationRegistry};

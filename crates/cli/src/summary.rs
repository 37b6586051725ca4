//! Run statistics printed after the `run` command.

use std::time::Duration;

use contracts::BackendId;
use dispatcher::StatsSnapshot;
use integration_registry::{ActivationOutcome, BackendMetricsSnapshot, IntegrationRegistry};

/// Statistics from a dispatcher run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Total duration of the run
    pub duration: Duration,

    /// Events read from the input file
    pub events_read: usize,

    /// Dispatcher counters at shutdown
    pub stats: StatsSnapshot,

    /// Activation outcome of every known backend (empty if never live)
    pub report: Vec<(BackendId, ActivationOutcome)>,

    /// Per-backend delivery counters
    pub backends: Vec<(BackendId, BackendMetricsSnapshot)>,
}

impl RunSummary {
    pub fn with_registry(mut self, registry: Option<&IntegrationRegistry>) -> Self {
        if let Some(registry) = registry {
            self.report = registry.report().to_vec();
            self.backends = registry
                .backends()
                .iter()
                .map(|b| (b.id(), b.metrics().snapshot()))
                .collect();
        }
        self
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n=== Dispatch Statistics ===\n");

        println!("Overview");
        println!("  Duration:            {:.2}s", self.duration.as_secs_f64());
        println!("  Events read:         {}", self.events_read);
        println!("  Submitted:           {}", self.stats.submitted);
        println!("  Buffered:            {}", self.stats.buffered);
        println!("  Replayed:            {}", self.stats.replayed);
        println!("  Live:                {}", self.stats.live);
        println!("  Discarded:           {}", self.stats.discarded);
        println!("  Delivery failures:   {}", self.stats.delivery_failures);
        println!(
            "  Lifecycle:           {} forwarded, {} dropped",
            self.stats.lifecycle_forwarded, self.stats.lifecycle_dropped
        );

        if !self.report.is_empty() {
            println!("\nActivation");
            for (id, outcome) in &self.report {
                let text = match outcome {
                    ActivationOutcome::Activated => "activated".to_string(),
                    ActivationOutcome::NotLinked => "not linked".to_string(),
                    ActivationOutcome::NotEnabled => "not enabled".to_string(),
                    ActivationOutcome::Failed(reason) => format!("failed: {reason}"),
                };
                println!("  {:<18} {}", id.settings_key(), text);
            }
        }

        if !self.backends.is_empty() {
            println!("\nBackends");
            for (id, metrics) in &self.backends {
                println!(
                    "  {:<18} delivered={} failures={} lifecycle={}",
                    id.settings_key(),
                    metrics.delivered_count,
                    metrics.failure_count,
                    metrics.lifecycle_count
                );
            }
        }

        println!();
    }
}

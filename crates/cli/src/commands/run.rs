//! `run` command implementation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use contracts::{CollectorConfig, LifecycleContext, LifecycleKind};
use dispatcher::{DispatcherBuilder, DispatcherHandle};
use integration_registry::LogBackendFactory;
use settings_fetcher::{CachedSettingsClient, FileSettingsClient, SettingsClient};

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::events::read_events;
use crate::summary::RunSummary;

/// Execute the `run` command
pub async fn run_dispatch(args: &RunArgs) -> Result<()> {
    let started = Instant::now();
    info!(config = %args.config.display(), "Loading configuration");

    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    let mut config = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if let Some(ref settings) = args.settings {
        info!(settings = %settings.display(), "Overriding settings source from CLI");
        config.settings.source = settings.clone();
    }

    let events = match args.events {
        Some(ref path) => read_events(path)
            .with_context(|| format!("Failed to read events from {}", path.display()))?,
        None => Vec::new(),
    };

    info!(
        settings = %config.settings.source.display(),
        cache = ?config.settings.cache_path,
        max_attempts = ?config.retry.max_attempts,
        events = events.len(),
        "Configuration loaded"
    );

    let dispatcher = DispatcherBuilder::from_config(
        &config,
        settings_client(&config),
        Arc::new(LogBackendFactory),
    )
    .start();
    let handle = dispatcher.handle();

    let events_read = events.len();
    for event in events {
        handle.submit(event)?;
    }

    let shutdown_signal = setup_shutdown_signal();
    tokio::select! {
        live = wait_live(&handle, args.wait_live) => {
            if live {
                if let Some(ref component) = args.lifecycle {
                    forward_lifecycle(&handle, component);
                }
                handle.flush().await?;
            }
        }
        _ = shutdown_signal => {
            warn!("Received shutdown signal, stopping dispatcher...");
        }
    }

    let registry = handle.registry();
    let stats = dispatcher.shutdown().await;

    RunSummary {
        duration: started.elapsed(),
        events_read,
        stats,
        ..Default::default()
    }
    .with_registry(registry.as_deref())
    .print_summary();

    info!("Analytics Dispatch finished");
    Ok(())
}

/// Settings transport for the configured source, cached when configured
fn settings_client(config: &CollectorConfig) -> Arc<dyn SettingsClient> {
    let file: Arc<dyn SettingsClient> = Arc::new(FileSettingsClient::new(&config.settings.source));
    match config.settings.cache_path {
        Some(ref cache) => Arc::new(CachedSettingsClient::new(file, cache)),
        None => file,
    }
}

/// Wait for activation, returns false on timeout
async fn wait_live(handle: &DispatcherHandle, timeout_secs: u64) -> bool {
    let result = if timeout_secs == 0 {
        handle.wait_until_live().await
    } else {
        match tokio::time::timeout(Duration::from_secs(timeout_secs), handle.wait_until_live()).await
        {
            Ok(result) => result,
            Err(_) => {
                warn!(timeout_secs, "Activation did not complete in time");
                return false;
            }
        }
    };

    match result {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Dispatcher stopped before activation");
            false
        }
    }
}

fn forward_lifecycle(handle: &DispatcherHandle, component: &str) {
    let context = LifecycleContext::new(component);
    for kind in LifecycleKind::SEQUENCE {
        let reached = handle.notify_lifecycle(kind, &context);
        info!(kind = %kind, component, backends = reached, "Lifecycle forwarded");
    }
}

/// Setup Ctrl+C and SIGTERM signal handlers
async fn setup_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

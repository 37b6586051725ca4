//! `probe` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;

use contracts::BackendId;
use integration_registry::linked_backends;

use crate::cli::ProbeArgs;

#[derive(Serialize)]
struct BackendInfo {
    backend: &'static str,
    marker: &'static str,
    required_setting: &'static str,
    linked: bool,
}

/// Execute the `probe` command
pub fn run_probe(args: &ProbeArgs) -> Result<()> {
    let available = linked_backends();
    let backends: Vec<BackendInfo> = BackendId::ALL
        .into_iter()
        .map(|id| BackendInfo {
            backend: id.settings_key(),
            marker: id.marker(),
            required_setting: id.required_setting(),
            linked: available.contains(id),
        })
        .collect();

    if args.json {
        let json =
            serde_json::to_string_pretty(&backends).context("Failed to serialize probe result")?;
        println!("{}", json);
    } else {
        println!("\nLinked backends ({}/{}):", available.len(), BackendId::ALL.len());
        for info in &backends {
            let mark = if info.linked { "+" } else { "-" };
            println!(
                "  {} {:<18} feature={:<18} requires={}",
                mark, info.backend, info.marker, info.required_setting
            );
        }
        println!();
    }

    Ok(())
}

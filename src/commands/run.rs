//! Agent command handler.
//!
//! Runs the battery poll loop in the foreground until Ctrl+C.

use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

use crate::core::battery_monitor::{BatterySampler, CommandProbe, PollLoop};
use crate::core::{ConfigStore, JsonConfigStore};
use crate::platform::{DesktopNotifier, LogNotifier, Notifier};

/// Execute the run command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let store =
        Arc::new(JsonConfigStore::open_default().context("Failed to open configuration")?);
    let config = store.config();

    let interval = matches
        .get_one::<u64>("interval")
        .map(|secs| Duration::from_secs(*secs))
        .unwrap_or_else(|| config.poll_interval());

    let mut probe_config = config.probe.clone();
    if let Some(timeout_ms) = matches.get_one::<u64>("probe-timeout") {
        probe_config.timeout_ms = *timeout_ms;
    }
    if probe_config.timeout() >= interval {
        log::warn!(
            "Probe timeout ({:?}) is not shorter than the poll interval ({:?})",
            probe_config.timeout(),
            interval
        );
    }

    let probe = CommandProbe::from_config(&probe_config);
    if probe.resolve().is_none() {
        log::warn!(
            "Probe '{}' was not found in PATH; ticks will fail until it is installed",
            probe.program()
        );
    }

    let notifier: Arc<dyn Notifier> = if matches.get_flag("no-notify") {
        Arc::new(LogNotifier)
    } else {
        Arc::new(DesktopNotifier::default())
    };

    let sampler = BatterySampler::new(probe, probe_config.charging_marker.clone());
    let poll_loop = PollLoop::new(sampler, store.clone(), notifier).with_interval(interval);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .thread_name("battalert-worker")
        .build()?;

    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
    let ctrlc_tx = shutdown_tx.clone();
    ctrlc::set_handler(move || {
        let _ = ctrlc_tx.send(());
    })
    .map_err(|e| anyhow!("Failed to set Ctrl+C handler: {}", e))?;

    let thresholds = store.thresholds();
    println!("{}", "battalert is watching your battery".cyan().bold());
    println!(
        "{}",
        format!(
            "Low {}% / high {}%, checking every {}s",
            thresholds.low,
            thresholds.high,
            interval.as_secs()
        )
        .dimmed()
    );
    println!("{}", "Press Ctrl+C to stop".dimmed());

    runtime.block_on(poll_loop.run(shutdown_rx));
    drop(shutdown_tx);

    Ok(())
}

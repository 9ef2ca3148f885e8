use anyhow::{Context, Result};
use colored::Colorize;

use crate::core::battery_monitor::{evaluate, AlertCondition, BatterySampler, CommandProbe};
use crate::core::{ConfigStore, JsonConfigStore};

/// Sample the battery once and show what the agent would do, without notifying
pub fn execute() -> Result<()> {
    let store = JsonConfigStore::open_default().context("Failed to open configuration")?;
    let config = store.config();

    let probe = CommandProbe::from_config(&config.probe);
    match probe.resolve() {
        Some(path) => println!("{} {}", "Probe:".dimmed(), path.display()),
        None => println!(
            "{}",
            format!("⚠️  Probe '{}' not found in PATH", probe.program()).yellow()
        ),
    }

    let sampler = BatterySampler::new(probe, config.probe.charging_marker.clone());
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let reading = runtime
        .block_on(sampler.sample())
        .context("Failed to sample battery")?;

    let Some(level) = reading.level else {
        println!(
            "{}",
            "No battery percentage found in the probe output.".yellow()
        );
        return Ok(());
    };

    let thresholds = store.thresholds();
    println!("{} {}%", "Level:   ".white(), level.to_string().cyan().bold());
    println!(
        "{} {}",
        "Charging:".white(),
        if reading.is_charging {
            "yes".green()
        } else {
            "no".yellow()
        }
    );
    println!(
        "{} low {}%, high {}%",
        "Limits:  ".white(),
        thresholds.low,
        thresholds.high
    );

    match evaluate(&reading, &thresholds) {
        AlertCondition::None => println!("{}", "✓ Nothing to report".green()),
        AlertCondition::Low => println!("{}", "⚠️  Low battery alert would fire".red().bold()),
        AlertCondition::High => println!("{}", "⚠️  High battery alert would fire".red().bold()),
    }

    Ok(())
}

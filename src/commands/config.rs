use crate::core::{ConfigStore, JsonConfigStore, Thresholds};
use anyhow::{Context, Result};
use colored::Colorize;

pub fn handle_set(matches: &clap::ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("thresholds", sub_matches)) => set_thresholds(sub_matches),
        Some(("login", sub_matches)) => set_login(sub_matches),
        _ => {
            println!("Use 'battalert set --help' for more information.");
            Ok(())
        }
    }
}

pub fn handle_get(matches: &clap::ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("thresholds", _)) => get_thresholds(),
        Some(("login", _)) => get_login(),
        _ => {
            println!("Use 'battalert get --help' for more information.");
            Ok(())
        }
    }
}

fn set_thresholds(matches: &clap::ArgMatches) -> Result<()> {
    let low = *matches
        .get_one::<u8>("low")
        .context("Low threshold is required")?;
    let high = *matches
        .get_one::<u8>("high")
        .context("High threshold is required")?;

    let store = JsonConfigStore::open_default()?;

    if let Err(e) = store.set_thresholds(Thresholds { low, high }) {
        let current = store.thresholds();
        println!("{}", format!("✗ {}", e).red());
        println!(
            "{}",
            format!(
                "Keeping current thresholds: low {}%, high {}%",
                current.low, current.high
            )
            .dimmed()
        );
        return Err(e).context("Thresholds were not saved");
    }

    println!(
        "{} low {}%, high {}%",
        "✓ Thresholds set to:".green(),
        low.to_string().cyan().bold(),
        high.to_string().cyan().bold()
    );
    println!(
        "{}",
        format!("Saved to {}", store.path().display()).dimmed()
    );

    Ok(())
}

fn get_thresholds() -> Result<()> {
    let store = JsonConfigStore::open_default()?;
    let thresholds = store.thresholds();

    println!("{}", "Alert thresholds:".white());
    println!(
        "  {} {}",
        "Low: ".dimmed(),
        format!("{}%", thresholds.low).cyan().bold()
    );
    println!(
        "  {} {}",
        "High:".dimmed(),
        format!("{}%", thresholds.high).cyan().bold()
    );
    println!();
    println!("{}", "To change them, run:".white());
    println!("  {}", "battalert set thresholds <LOW> <HIGH>".cyan().bold());

    Ok(())
}

fn set_login(matches: &clap::ArgMatches) -> Result<()> {
    let state = matches
        .get_one::<String>("state")
        .context("State argument is required")?;
    let enable = state == "on";

    let store = JsonConfigStore::open_default()?;
    store
        .set_login_item(enable)
        .context("Failed to update launch at login")?;

    if enable {
        println!("{}", "✓ battalert will start at login".green());
    } else {
        println!("{}", "✓ battalert will no longer start at login".green());
    }

    Ok(())
}

fn get_login() -> Result<()> {
    let store = JsonConfigStore::open_default()?;

    if store.login_item() {
        println!("{} {}", "Launch at login:".white(), "on".green().bold());
    } else {
        println!("{} {}", "Launch at login:".white(), "off".yellow().bold());
        println!();
        println!("{}", "To enable it, run:".white());
        println!("  {}", "battalert set login on".cyan().bold());
    }

    Ok(())
}

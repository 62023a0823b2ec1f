use crate::commands::common;
use crate::{print_error, print_success, SettingsCommands};
use colored::*;
use rust_decimal::Decimal;
use shoal_core::{SettingsHandle, SLIPPAGE_PRESETS};
use std::path::Path;

/// Settings are validated here, applied through the shared handle's
/// single setter path, and only then persisted — an invalid input
/// never reaches the handle or the disk.
pub fn handle(action: SettingsCommands, config_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SettingsCommands::Show => show(config_dir),
        SettingsCommands::Set { slippage, deadline } => set(slippage, deadline, config_dir),
    }
}

fn show(config_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let settings = common::load_settings(config_dir);
    let percent = settings.slippage * Decimal::from(100);

    println!("{}", "Transaction Settings".cyan().bold());
    println!("{}", "─".repeat(40));
    println!(
        "  {} {}%",
        "Slippage Tolerance:".bold(),
        percent.normalize().to_string().green()
    );
    println!(
        "  {} {} minutes",
        "Deadline:".bold(),
        (settings.ttl_secs / 60).to_string().green()
    );
    println!(
        "  {} {}",
        "Presets:".dimmed(),
        SLIPPAGE_PRESETS
            .iter()
            .map(|p| format!("{}%", (*p * Decimal::from(100)).normalize()))
            .collect::<Vec<_>>()
            .join(" / ")
            .dimmed()
    );

    Ok(())
}

fn set(
    slippage_percent: Option<Decimal>,
    deadline_minutes: Option<u64>,
    config_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    if slippage_percent.is_none() && deadline_minutes.is_none() {
        print_error("Nothing to set. Pass --slippage and/or --deadline.");
        return Ok(());
    }

    // The handle performs no validation itself — reject here.
    if let Some(pct) = slippage_percent {
        if pct < Decimal::ZERO || pct > Decimal::from(100) {
            print_error(&format!("Slippage must be within 0-100%, got {}%", pct));
            return Ok(());
        }
    }

    let handle = SettingsHandle::new(common::load_settings(config_dir));

    if let Some(pct) = slippage_percent {
        handle.set_slippage(pct / Decimal::from(100));
    }
    if let Some(minutes) = deadline_minutes {
        handle.set_ttl_secs(minutes * 60);
    }

    // Explicit persistence after validated input.
    let settings = handle.snapshot();
    settings.save_to_file(&common::settings_path(config_dir))?;

    print_success("Settings updated.");
    println!(
        "  {} {}%",
        "Slippage Tolerance:".bold(),
        (settings.slippage * Decimal::from(100)).normalize()
    );
    println!("  {} {} minutes", "Deadline:".bold(), settings.ttl_secs / 60);

    Ok(())
}

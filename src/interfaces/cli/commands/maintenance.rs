//! Expiry report and sweep commands

use colored::Colorize;
use std::sync::Arc;

use crate::config::get_config;
use crate::interfaces::cli::CliError;
use crate::services::{
    ExpiryClassifier, ExpiryClock, ExpiryReport, ExpirySweeper, maintenance::EXPIRING_WINDOW_DAYS,
};
use crate::storage::{Mapping, SeaOrmStorage};

fn clock_from_config() -> ExpiryClock {
    ExpiryClock::from_offset_minutes(get_config().maintenance.utc_offset_minutes)
}

fn print_rows(title: &str, rows: &[Mapping]) {
    println!("{}", title.bold());
    for m in rows {
        let expiry = m
            .expiry
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        println!(
            "  {:<24} {:<12} {}",
            m.path.cyan(),
            expiry.yellow(),
            m.name.as_deref().unwrap_or("").dimmed()
        );
    }
}

pub fn print_report(report: &ExpiryReport) {
    if report.expired.is_empty() && report.expiring.is_empty() {
        println!("{} No expired or expiring mappings", "ℹ".bold().blue());
        return;
    }

    if !report.expired.is_empty() {
        print_rows(&format!("Expired ({})", report.expired.len()).red().to_string(), &report.expired);
        println!();
    }
    if !report.expiring.is_empty() {
        print_rows(
            &format!(
                "Expiring within {} days ({})",
                EXPIRING_WINDOW_DAYS,
                report.expiring.len()
            )
            .yellow()
            .to_string(),
            &report.expiring,
        );
    }
}

pub async fn expiry_report(storage: Arc<SeaOrmStorage>) -> Result<(), CliError> {
    let classifier = ExpiryClassifier::new(storage, clock_from_config());
    let report = classifier.classify().await?;
    print_report(&report);
    Ok(())
}

pub async fn sweep_expired(
    storage: Arc<SeaOrmStorage>,
    batch_size: Option<u64>,
) -> Result<(), CliError> {
    let batch_size = batch_size.unwrap_or(get_config().maintenance.purge_batch_size);
    let sweeper = ExpirySweeper::new(storage, clock_from_config());
    let report = sweeper.purge_expired(batch_size).await?;

    println!(
        "{} Deleted {} expired mappings in {} batches",
        "✓".bold().green(),
        report.deleted.to_string().green(),
        report.batches
    );
    Ok(())
}

//! Legacy import command

use colored::Colorize;
use std::sync::Arc;

use crate::config::get_config;
use crate::interfaces::cli::CliError;
use crate::services::{
    ImportMode, ImportReport, Importer, JsonFileSource, LegacySource, MappingService, RedisSource,
};
use crate::storage::SeaOrmStorage;

pub async fn import_legacy(
    storage: Arc<SeaOrmStorage>,
    from_file: Option<String>,
    from_redis: bool,
    mode: ImportMode,
) -> Result<(), CliError> {
    let config = get_config();

    let source: Box<dyn LegacySource> = match (from_file, from_redis) {
        (Some(path), _) => {
            println!("{} {}", "Reading legacy export".yellow(), path.blue());
            Box::new(JsonFileSource::from_path(&path)?)
        }
        (None, true) => {
            if config.import.redis_url.is_empty() {
                return Err(CliError::ParseError(
                    "import.redis_url is not configured".to_string(),
                ));
            }
            println!("{}", "Connecting to legacy Redis store".yellow());
            Box::new(RedisSource::connect(&config.import.redis_url, &config.import.key_prefix).await?)
        }
        (None, false) => {
            return Err(CliError::ParseError(
                "either --from-file or --from-redis is required".to_string(),
            ));
        }
    };

    let service = Arc::new(MappingService::new(storage));
    let importer = Importer::new(service, config.import.page_size);
    let report = importer.import_all(source.as_ref(), mode).await?;
    print_import_report(&report);
    Ok(())
}

fn print_import_report(report: &ImportReport) {
    println!(
        "{} Created {}, skipped {}, failed {}",
        "✓".bold().green(),
        report.created.to_string().green(),
        report.skipped.to_string().yellow(),
        report.failed.to_string().red()
    );
    for failure in &report.errors {
        println!("  {} {}: {}", "✗".red(), failure.key.cyan(), failure.message);
    }
}

use anyhow::Result;
use clap::Parser;

use livelink::cli::{Cli, Commands};
use livelink::config::{DEFAULT_CONFIG_PATH, get_config, init_config_from};
use livelink::interfaces::cli::run_cli_command;
use livelink::runtime::run_server;
use livelink::system::logging::init_logging;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_config_from(cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH));

    let command = cli.command.unwrap_or(Commands::Serve);
    if command == Commands::ConfigGen {
        // 不初始化日志，保证输出可直接重定向为配置文件
        return run_cli_command(command).await.map_err(Into::into);
    }

    let config = get_config();
    let _log_guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
    };

    match command {
        Commands::Serve => run_server().await,
        other => {
            if let Err(e) = run_cli_command(other).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use std::process::ExitCode;
use tracing::{Instrument, error};

use dlbackup::config::Config;
use dlbackup::observability;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            observability::init_logging(cli.log_level.as_deref().unwrap_or("info"));
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    observability::init_logging(&config.logging.level);

    let span = observability::run_span(command_name(&cli.command));
    match run(cli.command, config).instrument(span).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "dlbackup failed");
            ExitCode::FAILURE
        }
    }
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Backup(_) => "backup",
        Commands::Status(_) => "status",
        Commands::Resolve(_) => "resolve",
        Commands::Config => "config",
    }
}

async fn run(command: Commands, config: Config) -> Result<(), AnyError> {
    match command {
        Commands::Backup(args) => commands::backup(args, &config).await?,
        Commands::Status(args) => commands::status(args, &config).await?,
        Commands::Resolve(args) => commands::resolve(args, &config).await?,
        Commands::Config => commands::show_config(&config)?,
    }

    Ok(())
}

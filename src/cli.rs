use clap::{Parser, Subcommand};
use std::path::PathBuf;

use dlbackup::config::{Config, ConfigError};

#[derive(Parser, Debug)]
#[command(name = "dlbackup")]
#[command(version, about = "Back up a CDP datalake and follow the job to completion", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to $DLBACKUP_CONFIG or config/dlbackup.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the backup location, start a backup and poll it to completion
    Backup(BackupArgs),
    /// Poll an existing backup by ID
    Status(StatusArgs),
    /// Print the environment and backup location for a datalake
    Resolve(ResolveArgs),
    /// Print the effective configuration as TOML
    Config,
}

#[derive(clap::Args, Debug)]
pub struct BackupArgs {
    /// Datalake to back up
    #[arg(short, long)]
    pub datalake: String,

    /// Backup name (default: <datalake>-backup-<YYYYMMDD-HHMMSS>)
    #[arg(short = 'n', long)]
    pub backup_name: Option<String>,

    /// Run the backup checks without producing a backup
    #[arg(long)]
    pub validation_only: bool,

    #[command(flatten)]
    pub polling: PollingArgs,

    /// Take the first environment when a CRN matches several
    #[arg(long)]
    pub lenient_environment_match: bool,
}

#[derive(clap::Args, Debug)]
pub struct StatusArgs {
    /// Datalake the backup belongs to
    #[arg(short, long)]
    pub datalake: String,

    /// Backup ID returned when the backup was started
    #[arg(short, long)]
    pub backup_id: String,

    #[command(flatten)]
    pub polling: PollingArgs,
}

#[derive(clap::Args, Debug)]
pub struct ResolveArgs {
    /// Datalake to resolve
    #[arg(short, long)]
    pub datalake: String,

    /// Take the first environment when a CRN matches several
    #[arg(long)]
    pub lenient_environment_match: bool,
}

#[derive(clap::Args, Debug, Default)]
pub struct PollingArgs {
    /// Give up after this many minutes of polling
    #[arg(long)]
    pub max_poll_minutes: Option<u64>,

    /// Seconds between status checks
    #[arg(long)]
    pub poll_interval_seconds: Option<u64>,
}

impl PollingArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(minutes) = self.max_poll_minutes {
            config.polling.max_minutes = minutes;
        }
        if let Some(seconds) = self.poll_interval_seconds {
            config.polling.interval_seconds = seconds;
        }
    }
}

impl Cli {
    /// Load file and environment layers, apply flags, then validate the result
    pub fn load_config(&self) -> Result<Config, ConfigError> {
        let mut config = Config::load(self.config.clone())?;
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Fold command-line overrides into the loaded configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }

        match &self.command {
            Commands::Backup(args) => {
                args.polling.apply(config);
                if args.lenient_environment_match {
                    config.resolver.strict_environment_match = false;
                }
            }
            Commands::Status(args) => args.polling.apply(config),
            Commands::Resolve(args) => {
                if args.lenient_environment_match {
                    config.resolver.strict_environment_match = false;
                }
            }
            Commands::Config => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_backup_overrides() {
        let cli = Cli::parse_from([
            "dlbackup",
            "--log-level",
            "debug",
            "backup",
            "--datalake",
            "dl-01",
            "--validation-only",
            "--max-poll-minutes",
            "1",
            "--poll-interval-seconds",
            "5",
            "--lenient-environment-match",
        ]);

        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.polling.max_minutes, 1);
        assert_eq!(config.polling.interval_seconds, 5);
        assert!(!config.resolver.strict_environment_match);

        match cli.command {
            Commands::Backup(args) => {
                assert_eq!(args.datalake, "dl-01");
                assert!(args.validation_only);
                assert!(args.backup_name.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_status_keeps_config_defaults() {
        let cli = Cli::parse_from(["dlbackup", "status", "-d", "dl-01", "-b", "bkp-123"]);

        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.polling.max_minutes, 10);
        assert_eq!(config.polling.interval_seconds, 5);
        assert!(config.resolver.strict_environment_match);
    }

    #[test]
    fn test_flag_repairs_invalid_file_value() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");
        std::fs::write(&config_path, "[polling]\ninterval_seconds = 0\n").unwrap();
        let config_arg = config_path.to_string_lossy().into_owned();

        let repaired = Cli::parse_from([
            "dlbackup",
            "--config",
            config_arg.as_str(),
            "status",
            "-d",
            "dl-01",
            "-b",
            "bkp-123",
            "--poll-interval-seconds",
            "3",
        ]);
        let config = repaired.load_config().unwrap();
        assert_eq!(config.polling.interval_seconds, 3);

        let unrepaired = Cli::parse_from([
            "dlbackup",
            "--config",
            config_arg.as_str(),
            "status",
            "-d",
            "dl-01",
            "-b",
            "bkp-123",
        ]);
        assert!(matches!(
            unrepaired.load_config(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_datalake_is_required() {
        assert!(Cli::try_parse_from(["dlbackup", "backup"]).is_err());
    }
}

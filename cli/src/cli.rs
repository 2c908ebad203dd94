use std::path::PathBuf;

use bulwark_types::AppConfig;
use clap::{Parser, Subcommand};

use crate::commands;
use crate::error::CliError;

#[derive(Parser, Debug)]
#[command(name = "bulwark", version, about = "Mitigation and status-effect uptime analysis")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Mitigation summaries and status-effect uptimes for one fight
    Analyze {
        #[arg(short, long)]
        fight: PathBuf,
        /// Catalog TOML overriding the configured one
        #[arg(short, long)]
        catalog: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Tracked status-effect uptimes on one target
    Uptime {
        #[arg(short, long)]
        fight: PathBuf,
        #[arg(short, long, allow_negative_numbers = true)]
        target: i64,
        #[arg(long)]
        json: bool,
    },
    /// Analyze every fight JSON in a directory
    Batch {
        #[arg(short, long)]
        dir: PathBuf,
    },
    /// Show current settings
    Config,
    Exit,
}

/// Run a parsed command. Returns true when the session should end.
pub fn dispatch(command: &Commands, config: &AppConfig) -> Result<bool, CliError> {
    match command {
        Commands::Analyze {
            fight,
            catalog,
            json,
        } => commands::analyze(fight, catalog.as_deref(), *json, config)?,
        Commands::Uptime {
            fight,
            target,
            json,
        } => commands::uptime(fight, *target, *json, config)?,
        Commands::Batch { dir } => commands::batch(dir, config)?,
        Commands::Config => commands::show_settings(config)?,
        Commands::Exit => {
            commands::exit();
            return Ok(true);
        }
    }
    Ok(false)
}

/// Parse and run one REPL line
pub fn respond(line: &str, config: &AppConfig) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "bulwark".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match &cli.command {
        Some(command) => dispatch(command, config).map_err(|e| format_error(&e)),
        None => Ok(false),
    }
}

/// Error message with its `source` chain, one cause per line
pub fn format_error(err: &dyn std::error::Error) -> String {
    let mut message = format!("error: {err}\n");
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(&format!("  caused by: {cause}\n"));
        source = cause.source();
    }
    message
}

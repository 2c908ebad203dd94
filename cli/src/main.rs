use std::io::Write;
use std::process::ExitCode;

use bulwark_cli::cli::format_error;
use bulwark_cli::config::AppConfigExt;
use bulwark_cli::{Cli, dispatch, logging, readline, respond};
use bulwark_types::AppConfig;
use clap::Parser;

fn main() -> ExitCode {
    logging::init();
    let config = AppConfig::load();

    // One-shot when a subcommand is given on the command line
    if std::env::args().len() > 1 {
        let cli = Cli::parse();
        if let Some(command) = &cli.command {
            return match dispatch(command, &config) {
                Ok(_) => ExitCode::SUCCESS,
                Err(err) => {
                    eprint!("{}", format_error(&err));
                    ExitCode::FAILURE
                }
            };
        }
    }

    match run_repl(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_repl(config: &AppConfig) -> std::io::Result<()> {
    while let Some(line) = readline()? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, config) {
            Ok(true) => break,
            Ok(false) => {}
            Err(err) => {
                let mut stdout = std::io::stdout();
                write!(stdout, "{err}")?;
                stdout.flush()?;
            }
        }
    }
    Ok(())
}

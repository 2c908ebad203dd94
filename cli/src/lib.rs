pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod repl;

pub use cli::{Cli, Commands, dispatch, respond};
pub use error::{CliError, ConfigError, InputError};
pub use repl::readline;

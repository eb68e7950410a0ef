//! Supply-chain CLI: one contract command per invocation.
//!
//! `supplychain [flags] COMMAND` loads the world state file, runs the command
//! in a ledger transaction, saves the state if a write committed, prints the
//! result and exits.

mod commands;
mod config;
mod format;
mod parse;

use std::path::PathBuf;
use std::process;

use supplychain_executor::{Command, Executor, Result};
use supplychain_storage::{load_world_state, save_world_state, Ledger, StateLock};
use tracing_subscriber::EnvFilter;

use commands::build_cli;
use config::{CliConfig, CONFIG_FILE_NAME};
use format::{format_error, format_output, OutputMode};
use parse::matches_to_command;

fn main() {
    let matches = build_cli().get_matches();

    let mode = if matches.get_flag("json") {
        OutputMode::Json
    } else if matches.get_flag("raw") {
        OutputMode::Raw
    } else {
        OutputMode::Human
    };

    let config_path = matches
        .get_one::<String>("config")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
    let config = match CliConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format_error(&e, mode));
            process::exit(1);
        }
    };

    init_tracing(&config.log_level);

    let state_path = matches
        .get_one::<String>("state")
        .map(PathBuf::from)
        .unwrap_or_else(|| config.state_file.clone());

    let cmd = match matches_to_command(&matches) {
        Ok(cmd) => cmd,
        Err(e) => {
            eprintln!("{}", format_error(&e, mode));
            process::exit(1);
        }
    };

    if cmd == Command::InitLedger {
        if let Err(e) = CliConfig::write_default_if_missing(&config_path) {
            tracing::warn!(path = %config_path.display(), error = %e, "could not write default config");
        }
    }

    match run(cmd, &state_path) {
        Ok(output) => {
            let formatted = format_output(&output, mode);
            if !formatted.is_empty() {
                println!("{}", formatted);
            }
        }
        Err(e) => {
            eprintln!("{}", format_error(&e, mode));
            process::exit(1);
        }
    }
}

/// Load, execute, and persist on a committed write.
///
/// The state file lock is held from load to save, so a concurrent invocation
/// fails instead of overwriting this one's write.
fn run(cmd: Command, state_path: &std::path::Path) -> Result<supplychain_executor::Output> {
    let _lock = StateLock::acquire(state_path)?;
    let state = load_world_state(state_path)?;
    let executor = Executor::new(Ledger::with_state(state));

    let is_write = cmd.is_write();
    let output = executor.execute(cmd)?;
    if is_write {
        save_world_state(executor.ledger().state(), state_path)?;
    }
    Ok(output)
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

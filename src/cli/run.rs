//! Dispatches to the command handler for the parsed arguments.
//!
//! # Returns
//! - `Ok(ExitStatus)` once the command ran, possibly with failed templates
//! - `Err` if the command could not run (e.g. invalid config, bad target)

use anyhow::Result;

use super::{
    args::{Arguments, Command},
    commands::{extract::extract, init::init},
    exit_status::ExitStatus,
};

pub fn run(Arguments { command }: Arguments) -> Result<ExitStatus> {
    match command {
        Some(Command::Extract(cmd)) => extract(cmd),
        Some(Command::Init) => init(),
        None => {
            anyhow::bail!("No command provided. Use --help to see available commands.")
        }
    }
}

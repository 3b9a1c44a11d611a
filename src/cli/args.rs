//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `extract`: Replace hard-coded text in HAML templates with key references
//! - `init`: Initialize hamlkey configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::store::OutputMode;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Extract(cmd)) => cmd.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    /// Template file or directory of templates
    pub path: PathBuf,

    /// Confirm every replacement
    #[arg(short, long)]
    pub interactive: bool,

    /// Where rewritten templates go (overrides config file)
    #[arg(long, value_enum)]
    pub output_mode: Option<OutputMode>,

    /// Locale the extracted texts belong to (overrides config file)
    #[arg(long)]
    pub locale: Option<String>,

    /// Catalog JSON file (overrides config file)
    #[arg(long, env = "HAMLKEY_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Root the view scopes are derived from (overrides config file)
    #[arg(long)]
    pub views_root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Replace hard-coded text in HAML templates with translation keys
    Extract(ExtractCommand),
    /// Initialize a new .hamlkeyrc.json configuration file
    Init,
}

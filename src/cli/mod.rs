use anyhow::Result;

mod args;
mod commands;
mod exit_status;
mod prompt;
mod report;
mod run;

pub use args::{Arguments, Command, ExtractCommand};
pub use exit_status::ExitStatus;
pub use prompt::TerminalPrompter;
pub use report::{ExtractSummary, FAILURE_MARK, FileFailure, SUCCESS_MARK, print_extract_summary_to};

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let Some(args) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };

    run::run(args)
}

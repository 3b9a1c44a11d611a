use std::process::ExitCode;

/// Exit status for CLI commands.
///
/// - `Success` (0): every template was processed
/// - `Failure` (1): at least one template could not be processed
/// - `Error` (2): the command could not run (config error, bad target, etc.)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    /// Some templates failed; the others were still processed.
    Failure,
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}

//! Collaborator traits for the line processor.
//!
//! The processor never talks to a terminal or a file directly: decisions come
//! from a [`Prompter`] and tagged lines go to an [`ExclusionSink`].

use std::{
    io,
    path::{Path, PathBuf},
};

use super::resolver::Decision;

/// Source of decisions for proposed replacements.
pub trait Prompter {
    /// Decide what to do with `original` given the proposed `replacement`.
    /// Blocks until a decision is available.
    fn ask(&mut self, original: &str, replacement: &str) -> Decision;

    /// Called once when the rest of a document is copied through unchanged.
    fn moving_to_next_file(&mut self) {}
}

/// Non-interactive prompter: every proposal is accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoAccept;

impl Prompter for AutoAccept {
    fn ask(&mut self, _original: &str, _replacement: &str) -> Decision {
        Decision::Replace
    }
}

/// Receives lines the user chose to leave as-is for good.
pub trait ExclusionSink {
    fn record(&mut self, path: &Path, line_no: usize) -> io::Result<()>;
}

impl ExclusionSink for Vec<(PathBuf, usize)> {
    fn record(&mut self, path: &Path, line_no: usize) -> io::Result<()> {
        self.push((path.to_path_buf(), line_no));
        Ok(())
    }
}

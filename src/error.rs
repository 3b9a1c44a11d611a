//! Error types for the extraction pipeline.
//!
//! Aborting a file is not an error: it travels as
//! [`LineOutcome::Abort`](crate::extract::LineOutcome) and never leaves the
//! document assembler.

use std::path::PathBuf;

use thiserror::Error;

use crate::haml::SyntaxError;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// The document failed structural validation, before or after rewriting.
    #[error("invalid HAML syntax in {}: {source}", path.display())]
    InvalidSyntax {
        path: PathBuf,
        #[source]
        source: SyntaxError,
    },

    /// The extract target is neither a template file nor a directory.
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// The classifier produced no role for a line of the document.
    #[error("no line type defined for {}:{line}", path.display())]
    NotDefinedLineType { path: PathBuf, line: usize },

    #[error("failed to access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog file exists but cannot be merged into.
    #[error("invalid catalog {}: {reason}", path.display())]
    Catalog { path: PathBuf, reason: String },
}

impl ExtractError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Suffix appended to a template path in [`OutputMode::Dump`].
pub const DUMP_SUFFIX: &str = ".i18n-extractor.haml";

/// Where rewritten templates go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Write the template back in place.
    #[default]
    Overwrite,
    /// Write next to the template as `<path>.i18n-extractor.haml`.
    Dump,
    /// Print to stdout; nothing on disk changes.
    Stdout,
}

impl OutputMode {
    /// Whether the catalog and templates are written to disk.
    pub fn persists(self) -> bool {
        !matches!(self, OutputMode::Stdout)
    }
}

pub fn dump_path(path: &Path) -> PathBuf {
    let mut dumped = path.as_os_str().to_owned();
    dumped.push(DUMP_SUFFIX);
    PathBuf::from(dumped)
}

pub struct DocumentWriter {
    mode: OutputMode,
}

impl DocumentWriter {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }

    /// Persist a rewritten template. Returns the file written, if any.
    pub fn write<W: Write>(&self, path: &Path, body: &str, stdout: &mut W) -> Result<Option<PathBuf>> {
        match self.mode {
            OutputMode::Overwrite => {
                fs::write(path, body)
                    .with_context(|| format!("Failed to write file: {}", path.display()))?;
                Ok(Some(path.to_path_buf()))
            }
            OutputMode::Dump => {
                let target = dump_path(path);
                fs::write(&target, body)
                    .with_context(|| format!("Failed to write file: {}", target.display()))?;
                Ok(Some(target))
            }
            OutputMode::Stdout => {
                stdout
                    .write_all(body.as_bytes())
                    .context("Failed to write to stdout")?;
                Ok(None)
            }
        }
    }
}

//! Append-only list of `path:line` entries the user tagged as final.

use std::{
    collections::{BTreeSet, HashMap},
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::warn;

use crate::extract::ExclusionSink;
use crate::utils::absolute_path;

/// Entries are keyed by absolute path and written relative to the
/// directory holding the list, so any spelling of a template path finds them.
pub struct ExclusionFile {
    path: PathBuf,
    base: PathBuf,
    entries: HashMap<PathBuf, BTreeSet<usize>>,
}

impl ExclusionFile {
    /// Load the list, or start an empty one when the file does not exist.
    pub fn open(path: &Path) -> Result<Self> {
        let base = absolute_path(path.parent().unwrap_or(Path::new(".")));
        let mut entries: HashMap<PathBuf, BTreeSet<usize>> = HashMap::new();

        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read exclusions: {}", path.display()))?;
            for (idx, line) in content.lines().enumerate() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                match parse_entry(line) {
                    Some((file, line_no)) => {
                        entries
                            .entry(absolute_path(&base.join(file)))
                            .or_default()
                            .insert(line_no);
                    }
                    None => warn!(
                        path = %path.display(),
                        line = idx + 1,
                        "ignoring malformed exclusion entry"
                    ),
                }
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            base,
            entries,
        })
    }

    /// Lines of `file` that must not be proposed again.
    pub fn lines_for(&self, file: &Path) -> BTreeSet<usize> {
        self.entries
            .get(&absolute_path(file))
            .cloned()
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ExclusionSink for ExclusionFile {
    fn record(&mut self, file: &Path, line_no: usize) -> io::Result<()> {
        let file = absolute_path(file);
        let stored = file.strip_prefix(&self.base).unwrap_or(&file).to_path_buf();
        if !self.entries.entry(file).or_default().insert(line_no) {
            return Ok(());
        }

        let mut out = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(out, "{}:{}", stored.display(), line_no)
    }
}

fn parse_entry(line: &str) -> Option<(PathBuf, usize)> {
    let (file, line_no) = line.rsplit_once(':')?;
    let line_no = line_no.trim().parse().ok().filter(|n| *n > 0)?;
    (!file.is_empty()).then(|| (PathBuf::from(file), line_no))
}

use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::warn;
use walkdir::WalkDir;

use crate::error::ExtractError;
use crate::store::DUMP_SUFFIX;

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Result of scanning for templates.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Templates in processing order.
    pub files: Vec<PathBuf>,
    pub skipped_count: usize,
}

/// Resolve the extract target into the templates to process.
///
/// A file is taken as-is; a directory is walked for `.haml` templates, minus
/// those matching `ignores` and previous dump output.
pub fn resolve_targets(target: &Path, ignores: &[String]) -> Result<ScanResult, ExtractError> {
    if target.is_file() && is_template(target) {
        return Ok(ScanResult {
            files: vec![target.to_path_buf()],
            skipped_count: 0,
        });
    }
    if !target.is_dir() {
        return Err(ExtractError::NotADirectory(target.to_path_buf()));
    }
    Ok(scan_templates(target, ignores))
}

pub fn scan_templates(base_dir: &Path, ignore_patterns: &[String]) -> ScanResult {
    let mut files = Vec::new();
    let mut skipped_count = 0;

    let mut literal_ignore_paths: Vec<PathBuf> = Vec::new();
    let mut glob_patterns: Vec<Pattern> = Vec::new();

    for p in ignore_patterns {
        if is_glob_pattern(p) {
            match Pattern::new(p) {
                Ok(pattern) => glob_patterns.push(pattern),
                Err(e) => warn!(pattern = %p, error = %e, "invalid ignore pattern"),
            }
        } else {
            literal_ignore_paths.push(base_dir.join(p));
        }
    }

    for entry in WalkDir::new(base_dir).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                skipped_count += 1;
                warn!(error = %e, "cannot access path");
                continue;
            }
        };
        let path = entry.path();
        let path_str = path.to_string_lossy();

        if literal_ignore_paths
            .iter()
            .any(|ignore_path| path.starts_with(ignore_path))
        {
            continue;
        }

        if glob_patterns.iter().any(|p| p.matches(&path_str)) {
            continue;
        }

        if entry.file_type().is_file() && is_template(path) {
            files.push(path.to_path_buf());
        }
    }

    ScanResult {
        files,
        skipped_count,
    }
}

fn is_template(path: &Path) -> bool {
    let is_haml = matches!(path.extension().and_then(|e| e.to_str()), Some("haml"));
    is_haml && !path.to_string_lossy().ends_with(DUMP_SUFFIX)
}

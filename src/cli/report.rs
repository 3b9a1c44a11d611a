//! Report formatting and printing utilities.
//!
//! Separate from the pipeline so hamlkey can be used as a library.

use std::io::Write;

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use crate::extract::DocumentTrace;
use crate::pipeline::FileReport;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// A template that could not be processed.
#[derive(Debug)]
pub struct FileFailure {
    pub path: String,
    pub error: anyhow::Error,
}

/// Everything an extract run did.
#[derive(Debug, Default)]
pub struct ExtractSummary {
    pub reports: Vec<FileReport>,
    pub failures: Vec<FileFailure>,
    pub traces: Vec<DocumentTrace>,
    pub catalog_path: String,
}

impl ExtractSummary {
    pub fn replaced(&self) -> usize {
        self.reports.iter().map(|r| r.stats.replaced).sum()
    }

    pub fn keys_added(&self) -> usize {
        self.reports.iter().map(|r| r.keys.added).sum()
    }

    pub fn keys_updated(&self) -> usize {
        self.reports.iter().map(|r| r.keys.updated).sum()
    }
}

pub fn print_extract_summary_to<W: Write>(summary: &ExtractSummary, verbose: bool, writer: &mut W) {
    let changed: Vec<&FileReport> = summary
        .reports
        .iter()
        .filter(|r| verbose || r.stats.replaced > 0 || r.aborted_at.is_some())
        .collect();

    let width = changed
        .iter()
        .map(|r| UnicodeWidthStr::width(r.path.to_string_lossy().as_ref()))
        .max()
        .unwrap_or(0);

    for report in changed {
        let path = report.path.to_string_lossy();
        let padding = " ".repeat(width - UnicodeWidthStr::width(path.as_ref()));
        let mut line = format!(
            "  {}{}  {} replaced",
            path.cyan(),
            padding,
            report.stats.replaced
        );
        if report.stats.declined > 0 {
            line.push_str(&format!(", {} declined", report.stats.declined));
        }
        if report.stats.tagged > 0 {
            line.push_str(&format!(", {} tagged", report.stats.tagged));
        }
        if let Some(at) = report.aborted_at {
            line.push_str(&format!(", {}", format!("unchanged from line {}", at).yellow()));
        }
        if let Some(written) = &report.written
            && written != &report.path
        {
            line.push_str(&format!(" -> {}", written.display()));
        }
        let _ = writeln!(writer, "{}", line);
    }

    if verbose {
        for trace in &summary.traces {
            let _ = writeln!(
                writer,
                "  {} {} lines, {} proposed",
                trace.path.display().to_string().dimmed(),
                trace.line_count,
                trace.stats.proposed
            );
        }
    }

    for failure in &summary.failures {
        let _ = writeln!(
            writer,
            "{} {}: {:#}",
            "error:".bold().red(),
            failure.path,
            failure.error
        );
    }

    let files = summary.reports.len();
    let mut message = format!(
        "Extracted {} {} from {} {} into {}",
        summary.replaced(),
        plural(summary.replaced(), "text", "texts"),
        files,
        plural(files, "template", "templates"),
        summary.catalog_path
    );
    let (added, updated) = (summary.keys_added(), summary.keys_updated());
    if added + updated > 0 {
        message.push_str(&format!(
            " ({} {} added, {} updated)",
            added,
            plural(added, "key", "keys"),
            updated
        ));
    }

    if summary.failures.is_empty() {
        let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), message.green());
    } else {
        let _ = writeln!(
            writer,
            "{} {} ({} {} failed)",
            FAILURE_MARK.red(),
            message.red(),
            summary.failures.len(),
            plural(summary.failures.len(), "template", "templates")
        );
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::extract::LineStats;
    use crate::store::MergeStats;

    fn report(path: &str, replaced: usize) -> FileReport {
        report_with_keys(
            path,
            replaced,
            MergeStats {
                added: replaced,
                ..Default::default()
            },
        )
    }

    fn report_with_keys(path: &str, replaced: usize, keys: MergeStats) -> FileReport {
        FileReport {
            path: PathBuf::from(path),
            scope: "home.index".to_string(),
            stats: LineStats {
                proposed: replaced,
                replaced,
                declined: 0,
                tagged: 0,
            },
            keys,
            aborted_at: None,
            written: None,
        }
    }

    fn render(summary: &ExtractSummary, verbose: bool) -> String {
        let mut out = Vec::new();
        print_extract_summary_to(summary, verbose, &mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_summary_lists_changed_templates() {
        let summary = ExtractSummary {
            reports: vec![
                report("app/views/home/index.html.haml", 2),
                report("app/views/home/empty.html.haml", 0),
            ],
            catalog_path: "config/locales/en.json".to_string(),
            ..Default::default()
        };

        let output = render(&summary, false);
        assert!(output.contains("index.html.haml"));
        assert!(!output.contains("empty.html.haml"));
        assert!(output.contains(
            "Extracted 2 texts from 2 templates into config/locales/en.json (2 keys added, 0 updated)"
        ));
    }

    #[test]
    fn test_summary_counts_catalog_keys() {
        let summary = ExtractSummary {
            reports: vec![
                report_with_keys(
                    "a.haml",
                    3,
                    MergeStats {
                        added: 1,
                        updated: 1,
                        kept: 1,
                    },
                ),
                report_with_keys("b.haml", 0, MergeStats::default()),
            ],
            catalog_path: "en.json".to_string(),
            ..Default::default()
        };

        let output = render(&summary, false);
        assert!(output.contains("into en.json (1 key added, 1 updated)"));

        let quiet = ExtractSummary {
            reports: vec![report("a.haml", 0)],
            catalog_path: "en.json".to_string(),
            ..Default::default()
        };
        assert!(!render(&quiet, false).contains("added"));
    }

    #[test]
    fn test_summary_reports_failures() {
        let summary = ExtractSummary {
            reports: vec![report("a.haml", 1)],
            failures: vec![FileFailure {
                path: "b.haml".to_string(),
                error: anyhow::anyhow!("invalid HAML syntax"),
            }],
            catalog_path: "en.json".to_string(),
            ..Default::default()
        };

        let output = render(&summary, false);
        assert!(output.contains("b.haml: invalid HAML syntax"));
        assert!(output.contains("Extracted 1 text from 1 template into en.json"));
        assert!(output.contains("1 template failed"));
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "file", "files"), "file");
        assert_eq!(plural(0, "file", "files"), "files");
    }
}

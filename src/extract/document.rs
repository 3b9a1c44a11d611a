//! Whole-document driver over the line processor.

use std::path::PathBuf;

use tracing::info;

use super::{
    finder::TextFinder,
    processor::{CatalogMap, ExtractOptions, LineOutcome, LineProcessor, LineStats},
    replacer::KeyRegistry,
    traits::{ExclusionSink, Prompter},
};
use crate::error::ExtractError;
use crate::haml::{LineMap, classify};

/// A template split into lines, with the role of every line.
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    /// Lines without their line terminators.
    pub lines: Vec<String>,
    pub metadata: LineMap,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, source: &str, metadata: LineMap) -> Self {
        Self {
            path: path.into(),
            lines: source.lines().map(str::to_string).collect(),
            metadata,
        }
    }

    /// Split and classify a HAML source.
    pub fn parse(path: impl Into<PathBuf>, source: &str) -> Self {
        Self::new(path, source, classify(source))
    }
}

/// Result of running the extraction over one document.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// Rewritten source, one line per input line, newline-terminated.
    pub body: String,
    pub catalog: CatalogMap,
    pub keys: KeyRegistry,
    pub stats: LineStats,
    /// First line copied through unchanged after the user moved on.
    pub aborted_at: Option<usize>,
}

/// Summary of one document run, collected for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTrace {
    pub path: PathBuf,
    pub line_count: usize,
    pub stats: LineStats,
    pub aborted_at: Option<usize>,
}

pub struct DocumentAssembler<'a> {
    document: &'a Document,
    finder: &'a TextFinder,
    options: &'a ExtractOptions,
}

impl<'a> DocumentAssembler<'a> {
    pub fn new(document: &'a Document, finder: &'a TextFinder, options: &'a ExtractOptions) -> Self {
        Self {
            document,
            finder,
            options,
        }
    }

    /// Process every line in order.
    ///
    /// When the prompter asks to move on, the line it was asked about and
    /// every line after it are copied verbatim and nothing more is asked.
    pub fn run<P, E>(
        &self,
        keys: KeyRegistry,
        prompter: &mut P,
        exclusions: &mut E,
        diagnostics: Option<&mut Vec<DocumentTrace>>,
    ) -> Result<ExtractedDocument, ExtractError>
    where
        P: Prompter + ?Sized,
        E: ExclusionSink + ?Sized,
    {
        let lines = &self.document.lines;
        let mut processor = LineProcessor::new(
            self.document,
            self.finder,
            self.options,
            keys,
            prompter,
            exclusions,
        );

        let mut aborted_at = None;
        for (idx, line) in lines.iter().enumerate() {
            let line_no = idx + 1;
            if processor.process_line(line, line_no)? == LineOutcome::Abort {
                aborted_at = Some(line_no);
                break;
            }
        }

        if let Some(line_no) = aborted_at {
            info!(
                path = %self.document.path.display(),
                line = line_no,
                "copying the rest of the document unchanged"
            );
            processor.notify_moving_to_next_file();
            for line in &lines[line_no - 1..] {
                processor.pass_through(line);
            }
        }

        let (body_lines, catalog, keys, stats) = processor.finish();
        let mut body = body_lines.join("\n");
        body.push('\n');

        if let Some(diagnostics) = diagnostics {
            diagnostics.push(DocumentTrace {
                path: self.document.path.clone(),
                line_count: lines.len(),
                stats,
                aborted_at,
            });
        }

        Ok(ExtractedDocument {
            body,
            catalog,
            keys,
            stats,
            aborted_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use crate::extract::AutoAccept;

    #[test]
    fn test_document_parse_splits_lines() {
        let doc = Document::parse("a.haml", "%p Hi\r\n%p There\n");
        assert_eq!(doc.lines, vec!["%p Hi", "%p There"]);
        assert_eq!(doc.metadata.len(), 2);
    }

    #[test]
    fn test_empty_document() {
        let doc = Document::parse("empty.haml", "");
        let finder = TextFinder::default();
        let options = ExtractOptions::default();
        let mut sink: Vec<(PathBuf, usize)> = Vec::new();
        let result = DocumentAssembler::new(&doc, &finder, &options)
            .run(KeyRegistry::default(), &mut AutoAccept, &mut sink, None)
            .unwrap();

        assert_eq!(result.body, "\n");
        assert!(result.catalog.is_empty());
    }

    #[test]
    fn test_diagnostics_receive_one_trace() {
        let doc = Document::parse("a.haml", "%p Hi\n%p There\n");
        let finder = TextFinder::default();
        let options = ExtractOptions::default();
        let mut sink: Vec<(PathBuf, usize)> = Vec::new();
        let mut traces = Vec::new();
        DocumentAssembler::new(&doc, &finder, &options)
            .run(KeyRegistry::default(), &mut AutoAccept, &mut sink, Some(&mut traces))
            .unwrap();

        assert_eq!(
            traces,
            vec![DocumentTrace {
                path: PathBuf::from("a.haml"),
                line_count: 2,
                stats: LineStats {
                    proposed: 2,
                    replaced: 2,
                    declined: 0,
                    tagged: 0,
                },
                aborted_at: None,
            }]
        );
    }
}

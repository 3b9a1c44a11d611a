//! Per-line state machine: find, replace, resolve, apply.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::{
    document::Document,
    finder::TextFinder,
    line::split_indentation,
    replacer::{KeyRegistry, LineRecord, TextReplacer},
    resolver::{Candidate, Decision, resolve_action},
    traits::{ExclusionSink, Prompter},
};
use crate::error::ExtractError;

/// Line number to record, in processing order.
pub type CatalogMap = BTreeMap<usize, LineRecord>;

/// Result of processing one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Keep going. `proposed` tells whether a replacement was offered, not
    /// whether it was applied.
    Continue { proposed: bool },
    /// Stop analysing; the rest of the document is copied unchanged.
    Abort,
}

#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Ask the prompter about every proposal instead of accepting it.
    pub interactive: bool,
    /// Lines never proposed for replacement (previously tagged).
    pub skip_lines: BTreeSet<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineStats {
    pub proposed: usize,
    pub replaced: usize,
    pub declined: usize,
    pub tagged: usize,
}

pub struct LineProcessor<'a, P: ?Sized, E: ?Sized> {
    document: &'a Document,
    finder: &'a TextFinder,
    options: &'a ExtractOptions,
    prompter: &'a mut P,
    exclusions: &'a mut E,
    keys: KeyRegistry,
    body: Vec<String>,
    catalog: CatalogMap,
    stats: LineStats,
}

impl<'a, P, E> LineProcessor<'a, P, E>
where
    P: Prompter + ?Sized,
    E: ExclusionSink + ?Sized,
{
    pub fn new(
        document: &'a Document,
        finder: &'a TextFinder,
        options: &'a ExtractOptions,
        keys: KeyRegistry,
        prompter: &'a mut P,
        exclusions: &'a mut E,
    ) -> Self {
        Self {
            document,
            finder,
            options,
            prompter,
            exclusions,
            keys,
            body: Vec::with_capacity(document.lines.len()),
            catalog: CatalogMap::new(),
            stats: LineStats::default(),
        }
    }

    pub fn process_line(&mut self, raw: &str, line_no: usize) -> Result<LineOutcome, ExtractError> {
        let raw = raw.trim_end_matches(['\n', '\r']);
        let (whitespace, content) = split_indentation(raw);
        let path = &self.document.path;

        let meta = self
            .document
            .metadata
            .get(&line_no)
            .ok_or_else(|| ExtractError::NotDefinedLineType {
                path: path.clone(),
                line: line_no,
            })?;

        let found = if self.options.skip_lines.contains(&line_no) {
            None
        } else {
            self.finder.find(content, meta)
        };
        let candidate =
            found.map(|m| TextReplacer::replace(&m, content, line_no, path, &self.keys));
        let proposed = candidate.is_some();

        let decision = resolve_action(
            candidate.as_ref().map(|replacement| Candidate {
                original: content,
                replacement: &replacement.modified_line,
            }),
            self.options.interactive,
            &mut *self.prompter,
        );
        debug!(
            path = %path.display(),
            line = line_no,
            role = %meta.role,
            %decision,
            "processed line"
        );

        if proposed {
            self.stats.proposed += 1;
        }

        match (decision, candidate) {
            (Decision::Next, _) => return Ok(LineOutcome::Abort),
            (Decision::Tag, _) => {
                self.exclusions
                    .record(path, line_no)
                    .map_err(|source| ExtractError::io(path, source))?;
                self.stats.tagged += 1;
                self.body.push(raw.to_string());
            }
            (Decision::Replace, Some(replacement)) => {
                self.keys
                    .claim(&replacement.key, &replacement.original_text);
                self.body
                    .push(format!("{}{}", whitespace, replacement.modified_line));
                self.catalog
                    .insert(line_no, LineRecord::Replaced(replacement));
                self.stats.replaced += 1;
            }
            (Decision::Replace | Decision::NoReplace, _) => {
                if proposed {
                    self.stats.declined += 1;
                }
                self.catalog.insert(line_no, LineRecord::Unchanged);
                self.body.push(raw.to_string());
            }
        }

        Ok(LineOutcome::Continue { proposed })
    }

    /// Append a line verbatim, without any analysis.
    pub fn pass_through(&mut self, raw: &str) {
        self.body.push(raw.to_string());
    }

    pub fn notify_moving_to_next_file(&mut self) {
        self.prompter.moving_to_next_file();
    }

    pub fn finish(self) -> (Vec<String>, CatalogMap, KeyRegistry, LineStats) {
        (self.body, self.catalog, self.keys, self.stats)
    }
}

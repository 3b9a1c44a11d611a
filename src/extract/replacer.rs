//! Substitution of found text with a key reference.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use super::finder::{Match, MatchKind};
use crate::utils::slugify;

/// Render a lazy-lookup key reference, resolved against the view's scope.
pub fn key_reference(key: &str) -> String {
    format!("t('.{}')", key)
}

/// A committed or proposed replacement of one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub key: String,
    pub original_text: String,
    /// Line content with the key reference in place of the text.
    pub modified_line: String,
    pub path: PathBuf,
}

/// Catalog entry for a processed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineRecord {
    /// Nothing was replaced on this line.
    Unchanged,
    Replaced(Replacement),
}

impl LineRecord {
    pub fn replacement(&self) -> Option<&Replacement> {
        match self {
            LineRecord::Unchanged => None,
            LineRecord::Replaced(replacement) => Some(replacement),
        }
    }
}

/// Keys in use within one catalog scope, with the text each one holds.
///
/// The same text always gets the same key; a different text whose slug
/// collides gets a numeric suffix.
#[derive(Debug, Clone, Default)]
pub struct KeyRegistry {
    keys: HashMap<String, String>,
}

impl KeyRegistry {
    /// Seed the registry with keys already present in the catalog.
    pub fn from_existing(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            keys: entries.into_iter().collect(),
        }
    }

    /// The key `text` would get, without claiming it.
    pub fn propose(&self, text: &str, line_no: usize) -> String {
        let base = match slugify(text) {
            slug if slug.is_empty() => format!("text_{}", line_no),
            slug => slug,
        };

        let mut candidate = base.clone();
        let mut suffix = 2;
        while let Some(existing) = self.keys.get(&candidate) {
            if existing == text {
                break;
            }
            candidate = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        candidate
    }

    pub fn claim(&mut self, key: &str, text: &str) {
        self.keys
            .entry(key.to_string())
            .or_insert_with(|| text.to_string());
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

pub struct TextReplacer;

impl TextReplacer {
    /// Build the replacement for a match. Content outside the match span is
    /// copied byte for byte.
    pub fn replace(
        found: &Match,
        content: &str,
        line_no: usize,
        path: &Path,
        keys: &KeyRegistry,
    ) -> Replacement {
        let key = keys.propose(&found.text, line_no);
        let reference = key_reference(&key);

        // Bare text becomes an output expression; for tags the span starts
        // right after the head, so `%p Hello` turns into `%p= t(...)`.
        let substitute = match found.kind {
            MatchKind::Literal => reference,
            MatchKind::Text => format!("= {}", reference),
        };

        let modified_line = format!(
            "{}{}{}",
            &content[..found.span.start],
            substitute,
            &content[found.span.end..]
        );

        Replacement {
            key,
            original_text: found.text.clone(),
            modified_line,
            path: path.to_path_buf(),
        }
    }
}

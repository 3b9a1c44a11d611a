//! Detection of translatable text on a single line.
//!
//! Each [`Role`] maps to an ordered list of rules; the first rule that
//! matches wins. Roles whose content is never rendered as text have no rules.

use std::{collections::HashSet, ops::Range, sync::LazyLock};

use regex::Regex;

use crate::config::default_checked_attributes;
use crate::haml::{LineMetadata, Role};
use crate::utils::contains_alphabetic;

static STRING_LITERAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""((?:[^"\\]|\\.)*)"|'((?:[^'\\]|\\.)*)'"#).unwrap());

// `t('.key')`, `t :key`, `translate(...)`, `I18n.t(...)`
static KEY_REFERENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:\bI18n\.|(?:^|[^\w.]))(?:t|translate)[\s(]+['":]"#).unwrap()
});

// `- title = "Welcome"`, `- @title ||= 'Welcome'`
static ASSIGNMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^[@$]?[A-Za-z_]\w*\s*(?:\|\|)?=\s*("(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*')\s*$"#)
        .unwrap()
});

// Hash key right before a literal: `class: `, `:class => `, `'class' => `
static HASH_KEY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:([A-Za-z_][\w-]*):|:([A-Za-z_][\w-]*)\s*=>|["']([\w-]+)["']\s*=>)\s*$"#)
        .unwrap()
});

/// How the captured text appears in the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Bare template text, e.g. `%p Hello`.
    Text,
    /// A quoted string literal in code; the span includes the quotes.
    Literal,
}

/// Translatable text found on a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// The human-readable text, without quotes or surrounding whitespace.
    pub text: String,
    /// Byte range of the line content replaced by the key reference.
    pub span: Range<usize>,
    pub role: Role,
    pub kind: MatchKind,
}

type Rule = fn(&TextFinder, &str, &LineMetadata) -> Option<Match>;

const PLAIN_RULES: &[Rule] = &[TextFinder::plain_text];
const TAG_RULES: &[Rule] = &[TextFinder::tag_inline_script, TextFinder::tag_inline_text];
const SCRIPT_RULES: &[Rule] = &[TextFinder::script_literal];
const SILENT_SCRIPT_RULES: &[Rule] = &[TextFinder::assigned_literal];

fn rules(role: Role) -> &'static [Rule] {
    match role {
        Role::Plain => PLAIN_RULES,
        Role::Tag => TAG_RULES,
        Role::Script => SCRIPT_RULES,
        Role::SilentScript => SILENT_SCRIPT_RULES,
        Role::HamlComment | Role::Comment | Role::Doctype | Role::Filter | Role::Root => &[],
    }
}

#[derive(Debug, Clone)]
pub struct TextFinder {
    ignore_texts: HashSet<String>,
    checked_attributes: HashSet<String>,
}

impl Default for TextFinder {
    fn default() -> Self {
        Self::new(&[], &default_checked_attributes())
    }
}

impl TextFinder {
    /// `checked_attributes` lists the hash keys whose string values are
    /// user-facing (`title:`, `placeholder:`); other hash values are ignored.
    pub fn new(ignore_texts: &[String], checked_attributes: &[String]) -> Self {
        Self {
            ignore_texts: ignore_texts.iter().map(|t| t.trim().to_string()).collect(),
            checked_attributes: checked_attributes.iter().cloned().collect(),
        }
    }

    /// Find the first translatable text on a line.
    ///
    /// `content` is the line without its leading indentation.
    pub fn find(&self, content: &str, meta: &LineMetadata) -> Option<Match> {
        rules(meta.role)
            .iter()
            .find_map(|rule| rule(self, content, meta))
    }

    fn plain_text(&self, content: &str, _meta: &LineMetadata) -> Option<Match> {
        // `\` escapes a control character, `|` continues a multiline block
        if content.starts_with(['\\', '|']) {
            return None;
        }
        let marker = escape_marker_len(content);
        let text = content[marker..].trim();
        if !self.is_translatable(text) || text.contains('<') {
            return None;
        }
        Some(Match {
            text: text.to_string(),
            span: marker..content.len(),
            role: Role::Plain,
            kind: MatchKind::Text,
        })
    }

    fn tag_inline_text(&self, content: &str, meta: &LineMetadata) -> Option<Match> {
        let offset = value_offset(content, meta)?;
        let value = &content[offset..];
        if script_marker_len(value).is_some() || value.starts_with(['\\', '|']) {
            return None;
        }
        let marker = escape_marker_len(value);
        let text = value[marker..].trim();
        if !self.is_translatable(text) || text.contains('<') {
            return None;
        }
        // The whitespace separating the head from the text goes with the span.
        let start = if marker > 0 {
            offset + marker
        } else {
            content[..offset].trim_end().len()
        };
        Some(Match {
            text: text.to_string(),
            span: start..content.len(),
            role: Role::Tag,
            kind: MatchKind::Text,
        })
    }

    fn tag_inline_script(&self, content: &str, meta: &LineMetadata) -> Option<Match> {
        let offset = value_offset(content, meta)?;
        let marker = script_marker_len(&content[offset..])?;
        self.literal_in_code(content, offset + marker, Role::Tag)
    }

    fn script_literal(&self, content: &str, meta: &LineMetadata) -> Option<Match> {
        let offset = value_offset(content, meta)?;
        self.literal_in_code(content, offset, Role::Script)
    }

    fn assigned_literal(&self, content: &str, meta: &LineMetadata) -> Option<Match> {
        let offset = value_offset(content, meta)?;
        let literal = ASSIGNMENT_REGEX.captures(&content[offset..])?.get(1)?;
        let text = unescape(&literal.as_str()[1..literal.as_str().len() - 1]);
        if !self.is_translatable(&text) || looks_like_identifier(&text) {
            return None;
        }
        Some(Match {
            text,
            span: offset + literal.start()..offset + literal.end(),
            role: Role::SilentScript,
            kind: MatchKind::Literal,
        })
    }

    fn literal_in_code(&self, content: &str, code_start: usize, role: Role) -> Option<Match> {
        let code = &content[code_start..];
        if KEY_REFERENCE_REGEX.is_match(&STRING_LITERAL_REGEX.replace_all(code, "''")) {
            return None;
        }
        STRING_LITERAL_REGEX.captures_iter(code).find_map(|caps| {
            let whole = caps.get(0)?;
            let inner = caps.get(1).or_else(|| caps.get(2))?;
            let text = unescape(inner.as_str());
            if !self.is_translatable(&text)
                || looks_like_identifier(&text)
                || !self.accepts_hash_value(&code[..whole.start()])
            {
                return None;
            }
            Some(Match {
                text,
                span: code_start + whole.start()..code_start + whole.end(),
                role,
                kind: MatchKind::Literal,
            })
        })
    }

    fn is_translatable(&self, text: &str) -> bool {
        let text = text.trim();
        !text.is_empty()
            && contains_alphabetic(text)
            && !text.contains("#{")
            && !self.ignore_texts.contains(text)
    }

    /// A literal that is the value of a hash key is only taken when the key
    /// is a checked attribute.
    fn accepts_hash_value(&self, prefix: &str) -> bool {
        let Some(caps) = HASH_KEY_REGEX.captures(prefix) else {
            return true;
        };
        (1..=3)
            .find_map(|i| caps.get(i))
            .is_some_and(|key| self.checked_attributes.contains(key.as_str()))
    }
}

/// Byte offset of the metadata payload inside the line content.
fn value_offset(content: &str, meta: &LineMetadata) -> Option<usize> {
    let value = meta.value.as_deref()?;
    content
        .ends_with(value)
        .then(|| content.len() - value.len())
}

/// `!` or `&` followed by a space turns HTML escaping off or on for the rest
/// of the line; the marker stays in the template.
fn escape_marker_len(value: &str) -> usize {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some('!' | '&'), Some(c)) if c.is_whitespace() => 1,
        _ => 0,
    }
}

fn script_marker_len(value: &str) -> Option<usize> {
    if value.starts_with("&=") || value.starts_with("!=") {
        Some(2)
    } else if value.starts_with(['=', '~']) {
        Some(1)
    } else {
        None
    }
}

/// Paths, CSS classes, symbols and the like: single tokens with
/// punctuation typical of identifiers.
fn looks_like_identifier(text: &str) -> bool {
    if text.contains(char::is_whitespace) {
        return false;
    }
    text.contains(['/', '.', '_', '#', '@', ':', '=', '?', '&', '%'])
        || (text.contains('-') && !text.chars().any(char::is_uppercase))
}

fn unescape(inner: &str) -> String {
    inner
        .replace("\\\"", "\"")
        .replace("\\'", "'")
        .replace("\\\\", "\\")
}

//! Line-level structure of HAML documents.
//!
//! Every line of a template gets a [`Role`] plus an optional payload: the
//! inline content of a tag, the code of a script line, or a filter name.
//! Lines nested under a `:filter` or a `-#` comment belong to that block.
//! Ruby code ending in `,` and attribute lists left open carry on to the
//! following lines.

mod validate;

use std::{collections::BTreeMap, fmt};

use crate::extract::split_indentation;

pub use validate::{SyntaxError, validate};

/// Structural role of a single template line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Bare text rendered as-is.
    Plain,
    /// Output expression: `= code`, `~ code`, `&= code`, `!= code`.
    Script,
    /// Control statement: `- code`.
    SilentScript,
    /// Template comment: `-#`, never rendered.
    HamlComment,
    /// Element: `%p`, `.class`, `#id`.
    Tag,
    /// Rendered HTML comment: `/`.
    Comment,
    /// `!!!`
    Doctype,
    /// `:javascript`, `:markdown`, ... and the block nested under it.
    Filter,
    /// The document itself.
    Root,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Plain => "plain",
            Role::Script => "script",
            Role::SilentScript => "silent_script",
            Role::HamlComment => "haml_comment",
            Role::Tag => "tag",
            Role::Comment => "comment",
            Role::Doctype => "doctype",
            Role::Filter => "filter",
            Role::Root => "root",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifier output for one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMetadata {
    pub role: Role,
    /// Payload of the line. Always a suffix of the line content when set.
    pub value: Option<String>,
}

impl LineMetadata {
    pub fn new(role: Role) -> Self {
        Self { role, value: None }
    }

    pub fn with_value(role: Role, value: impl Into<String>) -> Self {
        Self {
            role,
            value: Some(value.into()),
        }
    }
}

/// Line number (1-based) to metadata, covering every line of a document.
pub type LineMap = BTreeMap<usize, LineMetadata>;

/// Classify every line of a HAML document.
pub fn classify(source: &str) -> LineMap {
    scan(source)
        .into_iter()
        .map(|line| (line.line_no, line.meta))
        .collect()
}

pub(crate) struct ScannedLine<'a> {
    pub line_no: usize,
    pub indent: &'a str,
    pub content: &'a str,
    pub meta: LineMetadata,
    /// Nested inside a filter or template comment block.
    pub in_block: bool,
    /// Carries on the statement or attribute list of an earlier line.
    pub continuation: bool,
    /// Tag whose attribute list is never closed.
    pub unclosed_head: bool,
}

impl<'a> ScannedLine<'a> {
    fn new(line_no: usize, raw: &'a str, meta: LineMetadata) -> Self {
        let (indent, content) = split_indentation(raw);
        Self {
            line_no,
            indent,
            content,
            meta,
            in_block: false,
            continuation: false,
            unclosed_head: false,
        }
    }
}

pub(crate) fn scan(source: &str) -> Vec<ScannedLine<'_>> {
    let raws: Vec<&str> = source.lines().collect();
    let mut lines = Vec::with_capacity(raws.len());
    // (role of the block opener, indentation width of the opener)
    let mut block: Option<(Role, usize)> = None;
    let mut idx = 0;

    while idx < raws.len() {
        let (indent, content) = split_indentation(raws[idx]);

        if let Some((role, base)) = block {
            if content.trim().is_empty() || indent.len() > base {
                let mut line = ScannedLine::new(idx + 1, raws[idx], LineMetadata::new(role));
                line.in_block = true;
                lines.push(line);
                idx += 1;
                continue;
            }
            block = None;
        }

        let meta = classify_content(content);
        if matches!(meta.role, Role::Filter | Role::HamlComment) {
            block = Some((meta.role, indent.len()));
        }

        let mut line = ScannedLine::new(idx + 1, raws[idx], meta);
        if line.meta.role == Role::Tag && tag_head_len(content).is_none() {
            match multiline_head(content, &raws[idx + 1..]) {
                Some((count, head)) => {
                    lines.push(line);
                    for offset in 1..=count {
                        let raw = raws[idx + offset];
                        let meta = if offset == count {
                            let (_, last) = split_indentation(raw);
                            payload(Role::Tag, &last[head..])
                        } else {
                            LineMetadata::new(Role::Tag)
                        };
                        let mut part = ScannedLine::new(idx + offset + 1, raw, meta);
                        part.continuation = true;
                        lines.push(part);
                    }
                    idx += count + 1;
                    idx = continue_statement(&raws, idx, &mut lines);
                    continue;
                }
                None => line.unclosed_head = true,
            }
        }

        lines.push(line);
        idx = continue_statement(&raws, idx + 1, &mut lines);
    }

    lines
}

/// Ruby code ending in `,` carries on to the next line. Continuation lines
/// take the role of the statement they belong to; returns the index of the
/// first line after the statement.
fn continue_statement<'a>(
    raws: &[&'a str],
    mut idx: usize,
    lines: &mut Vec<ScannedLine<'a>>,
) -> usize {
    let Some(last) = lines.last() else {
        return idx;
    };
    let role = match last.meta.role {
        Role::Script | Role::SilentScript => last.meta.role,
        Role::Tag if last.meta.value.as_deref().is_some_and(is_inline_script) => Role::Script,
        _ => return idx,
    };

    let mut open = last.content.trim_end().ends_with(',');
    while open && idx < raws.len() {
        let (_, content) = split_indentation(raws[idx]);
        let mut line = ScannedLine::new(idx + 1, raws[idx], payload(role, content));
        line.continuation = true;
        open = content.trim_end().ends_with(',');
        lines.push(line);
        idx += 1;
    }
    idx
}

/// For a tag whose attribute list stays open, the number of following lines
/// it takes to close and the head length within the content of the last one.
fn multiline_head(content: &str, rest: &[&str]) -> Option<(usize, usize)> {
    let mut joined = content.to_string();
    for (i, raw) in rest.iter().enumerate() {
        joined.push('\n');
        let start = joined.len();
        joined.push_str(raw);
        if let Some(head) = tag_head_len(&joined) {
            let (indent, _) = split_indentation(raw);
            return Some((i + 1, head.checked_sub(start + indent.len())?));
        }
    }
    None
}

fn classify_content(content: &str) -> LineMetadata {
    let Some(first) = content.chars().next() else {
        return LineMetadata::new(Role::Plain);
    };
    let rest = &content[first.len_utf8()..];

    if content.starts_with("!!!") {
        return LineMetadata::new(Role::Doctype);
    }
    if content.starts_with("-#") {
        return LineMetadata::new(Role::HamlComment);
    }

    match first {
        '-' => payload(Role::SilentScript, rest),
        '=' | '~' => payload(Role::Script, rest),
        '&' | '!' if rest.starts_with('=') => payload(Role::Script, &rest[1..]),
        '/' => LineMetadata::new(Role::Comment),
        ':' if rest.starts_with(|c: char| c.is_ascii_alphabetic()) => {
            payload(Role::Filter, rest)
        }
        '%' | '.' | '#' if is_tag_start(content) => match tag_head_len(content) {
            Some(head) => payload(Role::Tag, &content[head..]),
            None => LineMetadata::new(Role::Tag),
        },
        _ => LineMetadata::new(Role::Plain),
    }
}

fn payload(role: Role, rest: &str) -> LineMetadata {
    let value = rest.trim_start();
    if value.trim_end().is_empty() {
        LineMetadata::new(role)
    } else {
        LineMetadata::with_value(role, value)
    }
}

/// Inline tag content that is code: `%p= ...`, `%p~ ...`, `%p&= ...`, `%p!= ...`.
pub(crate) fn is_inline_script(value: &str) -> bool {
    value.starts_with(['=', '~']) || value.starts_with("&=") || value.starts_with("!=")
}

fn is_tag_start(content: &str) -> bool {
    let bytes = content.as_bytes();
    match (bytes.first(), bytes.get(1)) {
        (Some(b'%'), Some(b)) => is_name_byte(b),
        (Some(b'.' | b'#'), Some(b)) => is_class_byte(b),
        _ => false,
    }
}

/// Byte length of the tag head: name, classes/ids, attribute blocks and
/// whitespace/self-closing markers.
///
/// Returns `None` when the content does not start with a tag or an
/// attribute block is left unclosed.
///
/// ```
/// use hamlkey::haml::tag_head_len;
///
/// assert_eq!(tag_head_len("%p Hello"), Some(2));
/// assert_eq!(tag_head_len("%a{href: '/'} Home"), Some(13));
/// assert_eq!(tag_head_len(".note.small= msg"), Some(11));
/// assert_eq!(tag_head_len("%div{class: 'x'"), None);
/// ```
pub fn tag_head_len(content: &str) -> Option<usize> {
    let bytes = content.as_bytes();
    let mut i = 0;

    if bytes.first() == Some(&b'%') {
        i = 1 + count_while(&bytes[1..], is_name_byte);
        if i == 1 {
            return None;
        }
    }
    while matches!(bytes.get(i), Some(b'.' | b'#')) {
        let n = count_while(&bytes[i + 1..], is_class_byte);
        if n == 0 {
            break;
        }
        i += 1 + n;
    }
    if i == 0 {
        return None;
    }

    while let Some(&open) = bytes.get(i) {
        let close = match open {
            b'{' => b'}',
            b'(' => b')',
            b'[' => b']',
            _ => break,
        };
        i = closing_index(bytes, i, open, close)? + 1;
    }

    while matches!(bytes.get(i), Some(b'<' | b'>')) {
        i += 1;
    }
    if bytes.get(i) == Some(&b'/') {
        i += 1;
    }

    Some(i)
}

fn count_while(bytes: &[u8], pred: fn(&u8) -> bool) -> usize {
    bytes.iter().take_while(|b| pred(b)).count()
}

fn is_name_byte(b: &u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b':')
}

fn is_class_byte(b: &u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-')
}

/// Index of the bracket closing the one at `open_at`, skipping quoted strings.
fn closing_index(bytes: &[u8], open_at: usize, open: u8, close: u8) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(open_at) {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == q {
                quote = None;
            }
            continue;
        }
        if b == b'"' || b == b'\'' {
            quote = Some(b);
        } else if b == open {
            depth += 1;
        } else if b == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

//! Structural validation of HAML documents.
//!
//! Catches the errors a rewrite could introduce or that make line roles
//! unreliable: bad indentation, illegal nesting and unclosed attribute blocks.

use thiserror::Error;

use super::{Role, ScannedLine, scan};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {reason}")]
pub struct SyntaxError {
    pub line: usize,
    pub reason: String,
}

impl SyntaxError {
    pub fn new(line: usize, reason: impl Into<String>) -> Self {
        Self {
            line,
            reason: reason.into(),
        }
    }
}

/// Check that `source` is structurally valid HAML.
pub fn validate(source: &str) -> Result<(), SyntaxError> {
    let lines = scan(source);
    let mut unit: Option<&str> = None;
    let mut previous: Option<(usize, &ScannedLine<'_>)> = None;

    for line in &lines {
        if line.in_block || line.content.trim().is_empty() {
            continue;
        }
        // Nesting after a continued statement follows its opener's depth
        // and its last line's content.
        if line.continuation {
            if let Some((depth, _)) = previous {
                previous = Some((depth, line));
            }
            continue;
        }

        let depth = indentation_depth(line, &mut unit)?;

        match previous {
            None if depth > 0 => {
                return Err(SyntaxError::new(
                    line.line_no,
                    "indenting at the beginning of the document is illegal",
                ));
            }
            Some((prev_depth, _)) if depth > prev_depth + 1 => {
                return Err(SyntaxError::new(
                    line.line_no,
                    "the line was indented more than one level deeper than the previous line",
                ));
            }
            Some((prev_depth, prev)) if depth > prev_depth => check_nesting(prev, line.line_no)?,
            _ => {}
        }

        if line.unclosed_head {
            return Err(SyntaxError::new(line.line_no, "unbalanced attribute braces"));
        }

        previous = Some((depth, line));
    }

    Ok(())
}

fn indentation_depth<'a>(
    line: &ScannedLine<'a>,
    unit: &mut Option<&'a str>,
) -> Result<usize, SyntaxError> {
    let indent = line.indent;
    if indent.is_empty() {
        return Ok(0);
    }
    if indent.contains(' ') && indent.contains('\t') {
        return Err(SyntaxError::new(
            line.line_no,
            "indentation can't use both tabs and spaces",
        ));
    }

    let unit = *unit.get_or_insert(indent);
    if unit.as_bytes()[0] != indent.as_bytes()[0] || indent.len() % unit.len() != 0 {
        return Err(SyntaxError::new(
            line.line_no,
            format!(
                "inconsistent indentation: {} used, but the document uses {}",
                describe(indent),
                describe(unit)
            ),
        ));
    }

    Ok(indent.len() / unit.len())
}

fn check_nesting(parent: &ScannedLine<'_>, line_no: usize) -> Result<(), SyntaxError> {
    let reason = match parent.meta.role {
        Role::Plain => "illegal nesting: nesting within plain text is illegal",
        Role::Doctype => "illegal nesting: nesting within a header command is illegal",
        Role::Tag if parent.meta.value.is_some() => {
            "illegal nesting: content can't be both given on the same line as a tag and nested within it"
        }
        _ => return Ok(()),
    };
    Err(SyntaxError::new(line_no, reason))
}

fn describe(indent: &str) -> String {
    let (name, count) = if indent.starts_with('\t') {
        ("tab", indent.len())
    } else {
        ("space", indent.len())
    };
    format!("{} {}{}", count, name, if count == 1 { "" } else { "s" })
}

use std::fmt;

use super::traits::Prompter;

/// What to do with a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Keep the line and never propose it again.
    Tag,
    /// Stop processing the document; the rest is copied unchanged.
    Next,
    Replace,
    NoReplace,
}

impl Decision {
    /// Parse a prompt answer. An empty answer accepts the replacement.
    ///
    /// `N` (upper case) moves to the next file, `n` declines.
    pub fn from_answer(answer: &str) -> Option<Self> {
        match answer.trim() {
            "" | "y" | "Y" | "yes" => Some(Self::Replace),
            "n" | "no" => Some(Self::NoReplace),
            "t" | "T" | "tag" => Some(Self::Tag),
            "N" | "next" => Some(Self::Next),
            _ => None,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Tag => write!(f, "tag"),
            Decision::Next => write!(f, "next"),
            Decision::Replace => write!(f, "replace"),
            Decision::NoReplace => write!(f, "no-replace"),
        }
    }
}

/// A proposed change for one line.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub original: &'a str,
    pub replacement: &'a str,
}

/// Decide the action for a line.
///
/// Without a candidate the prompter is never consulted.
pub fn resolve_action<P: Prompter + ?Sized>(
    candidate: Option<Candidate<'_>>,
    interactive: bool,
    prompter: &mut P,
) -> Decision {
    match candidate {
        None => Decision::NoReplace,
        Some(_) if !interactive => Decision::Replace,
        Some(candidate) => prompter.ask(candidate.original, candidate.replacement),
    }
}

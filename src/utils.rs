//! Common utility functions shared across the codebase.

use std::path::{Component, Path, PathBuf};

/// Maximum number of words kept when turning text into a key.
const SLUG_MAX_WORDS: usize = 5;

/// Checks if the text contains at least one Unicode alphabetic character.
///
/// Returns false for empty strings, pure numbers, or pure symbols.
///
/// # Examples
///
/// ```
/// use hamlkey::utils::contains_alphabetic;
///
/// assert!(contains_alphabetic("Hello"));
/// assert!(contains_alphabetic("你好"));
/// assert!(contains_alphabetic("Hello123"));
/// assert!(!contains_alphabetic("123"));
/// assert!(!contains_alphabetic("---"));
/// assert!(!contains_alphabetic("$100"));
/// assert!(!contains_alphabetic(""));
/// ```
pub fn contains_alphabetic(text: &str) -> bool {
    text.chars().any(|c| c.is_alphabetic())
}

/// Absolute form of `path` with `.` and `..` resolved lexically, so
/// different spellings of the same file compare equal.
///
/// Falls back to the lexical cleanup alone when the working directory is
/// unavailable.
pub fn absolute_path(path: &Path) -> PathBuf {
    let path = if path.as_os_str().is_empty() {
        Path::new(".")
    } else {
        path
    };
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Turns human text into a lowercase ASCII key segment.
///
/// Words are runs of ASCII letters and digits; only the first few are kept.
/// Returns an empty string when the text has no ASCII word characters.
///
/// ```
/// use hamlkey::utils::slugify;
///
/// assert_eq!(slugify("Hello World"), "hello_world");
/// assert_eq!(slugify("Sign in, please!"), "sign_in_please");
/// assert_eq!(slugify("你好"), "");
/// ```
pub fn slugify(text: &str) -> String {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .take(SLUG_MAX_WORDS)
        .map(|word| word.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

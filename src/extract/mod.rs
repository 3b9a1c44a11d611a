//! Per-line extraction of hard-coded text.
//!
//! ```text
//! raw line
//!     ↓ split_indentation
//! (whitespace, content)
//!     ↓ TextFinder::find         (role-specific rules)
//! Option<Match>
//!     ↓ TextReplacer::replace    (key + modified content)
//! Option<Replacement>
//!     ↓ resolve_action           (auto-accept or Prompter)
//! Decision
//!     ↓ LineProcessor            (body + catalog map)
//! LineOutcome
//! ```
//!
//! [`DocumentAssembler`] drives the processor over a whole [`Document`] and
//! copies the remainder through unchanged when the user moves on.

mod document;
mod finder;
mod line;
mod processor;
mod replacer;
mod resolver;
mod traits;


pub use document::{Document, DocumentAssembler, DocumentTrace, ExtractedDocument};
pub use finder::{Match, MatchKind, TextFinder};
pub use line::split_indentation;
pub use processor::{CatalogMap, ExtractOptions, LineOutcome, LineProcessor, LineStats};
pub use replacer::{KeyRegistry, LineRecord, Replacement, TextReplacer, key_reference};
pub use resolver::{Candidate, Decision, resolve_action};
pub use traits::{AutoAccept, ExclusionSink, Prompter};

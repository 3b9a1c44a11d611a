//! Persistence of extraction results: the locale catalog, the rewritten
//! templates and the list of lines the user tagged as final.

mod catalog;
mod document;
mod exclusions;

pub use catalog::{CatalogWriter, KeyAction, MergeStats, view_scope};
pub use document::{DUMP_SUFFIX, DocumentWriter, OutputMode, dump_path};
pub use exclusions::ExclusionFile;

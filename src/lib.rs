//! hamlkey - extract hard-coded text from HAML templates
//!
//! hamlkey is a CLI tool and library that finds human-readable text in HAML
//! views, replaces it with lazy-lookup key references (`t('.key')`) and
//! records the original text in a JSON locale catalog.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (commands, prompter, reporting)
//! - `config`: Configuration file loading and parsing
//! - `error`: Error types of the extraction pipeline
//! - `extract`: Per-line extraction core and document assembler
//! - `haml`: Line classifier and structural validator
//! - `pipeline`: Per-file driver from source to written outputs
//! - `scan`: Template discovery
//! - `store`: Catalog, template and exclusion-list writers
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod haml;
pub mod pipeline;
pub mod scan;
pub mod store;
pub mod utils;

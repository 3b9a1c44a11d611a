//! Per-file driver: read, validate, classify, extract, validate the result,
//! then write the catalog and the template.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::error::ExtractError;
use crate::extract::{
    Document, DocumentAssembler, DocumentTrace, ExtractOptions, LineStats, Prompter, TextFinder,
};
use crate::haml::validate;
use crate::store::{CatalogWriter, DocumentWriter, ExclusionFile, MergeStats, OutputMode, view_scope};
use crate::utils::absolute_path;

/// Settings for one extract run, after config and CLI overrides.
#[derive(Debug, Clone)]
pub struct ExtractSettings {
    pub locale: String,
    pub catalog_path: PathBuf,
    pub views_root: PathBuf,
    pub exclusions_file: PathBuf,
    pub output_mode: OutputMode,
    pub interactive: bool,
    pub ignore_texts: Vec<String>,
    pub checked_attributes: Vec<String>,
}

/// Outcome of one template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub scope: String,
    pub stats: LineStats,
    pub keys: MergeStats,
    /// Line from which the template was copied unchanged.
    pub aborted_at: Option<usize>,
    /// File the rewritten template went to, if any.
    pub written: Option<PathBuf>,
}

pub struct Pipeline<'a, P: ?Sized> {
    settings: &'a ExtractSettings,
    finder: TextFinder,
    catalog: CatalogWriter,
    exclusions: ExclusionFile,
    writer: DocumentWriter,
    prompter: &'a mut P,
    traces: Vec<DocumentTrace>,
}

impl<'a, P: Prompter + ?Sized> Pipeline<'a, P> {
    pub fn new(settings: &'a ExtractSettings, prompter: &'a mut P) -> Result<Self> {
        Ok(Self {
            settings,
            finder: TextFinder::new(&settings.ignore_texts, &settings.checked_attributes),
            catalog: CatalogWriter::open_or_create(&settings.catalog_path)?,
            exclusions: ExclusionFile::open(&settings.exclusions_file)?,
            writer: DocumentWriter::new(settings.output_mode),
            prompter,
            traces: Vec::new(),
        })
    }

    /// Run the extraction over one template.
    ///
    /// Nothing is written when the template or its rewrite fails validation.
    pub fn extract_file<W: Write>(&mut self, path: &Path, stdout: &mut W) -> Result<FileReport> {
        let source = fs::read_to_string(path).map_err(|source| ExtractError::io(path, source))?;
        validate(&source).map_err(|source| ExtractError::InvalidSyntax {
            path: path.to_path_buf(),
            source,
        })?;

        let document = Document::parse(path, &source);
        let scope = view_scope(
            &absolute_path(path),
            &absolute_path(&self.settings.views_root),
        );
        let keys = self.catalog.existing_keys(&self.settings.locale, &scope);
        let options = ExtractOptions {
            interactive: self.settings.interactive,
            skip_lines: self.exclusions.lines_for(path),
        };
        debug!(
            path = %path.display(),
            %scope,
            existing_keys = keys.len(),
            skipped_lines = options.skip_lines.len(),
            "extracting"
        );

        let result = DocumentAssembler::new(&document, &self.finder, &options).run(
            keys,
            &mut *self.prompter,
            &mut self.exclusions,
            Some(&mut self.traces),
        )?;

        validate(&result.body).map_err(|source| ExtractError::InvalidSyntax {
            path: path.to_path_buf(),
            source,
        })?;

        let persists = self.settings.output_mode.persists();
        let changed = result.stats.replaced > 0;

        let keys = self
            .catalog
            .merge(&self.settings.locale, &scope, &result.catalog);
        if persists && changed {
            self.catalog.save().with_context(|| {
                format!("Failed to update catalog for {}", path.display())
            })?;
        }

        let written = if changed || !persists {
            self.writer.write(path, &result.body, stdout)?
        } else {
            None
        };

        info!(
            path = %path.display(),
            replaced = result.stats.replaced,
            declined = result.stats.declined,
            tagged = result.stats.tagged,
            aborted_at = ?result.aborted_at,
            "extracted"
        );

        Ok(FileReport {
            path: path.to_path_buf(),
            scope,
            stats: result.stats,
            keys,
            aborted_at: result.aborted_at,
            written,
        })
    }

    pub fn catalog_path(&self) -> &Path {
        self.catalog.path()
    }

    /// Per-document traces collected so far.
    pub fn into_traces(self) -> Vec<DocumentTrace> {
        self.traces
    }
}

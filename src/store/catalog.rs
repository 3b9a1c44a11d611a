use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};

use crate::error::ExtractError;
use crate::extract::{CatalogMap, KeyRegistry};

/// Action taken on a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Added,
    Updated,
    /// The key already held the same text.
    Kept,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub added: usize,
    pub updated: usize,
    pub kept: usize,
}

impl MergeStats {
    fn count(&mut self, action: KeyAction) {
        match action {
            KeyAction::Added => self.added += 1,
            KeyAction::Updated => self.updated += 1,
            KeyAction::Kept => self.kept += 1,
        }
    }
}

/// Scope of a view inside the catalog, derived from its path relative to
/// the views root.
///
/// `app/views/users/_form.html.haml` under `app/views` gives `users.form`.
pub fn view_scope(path: &Path, views_root: &Path) -> String {
    let root = normal_parts(views_root);
    let mut parts = normal_parts(path);
    if parts.starts_with(&root) {
        parts.drain(..root.len());
    }

    if let Some(file) = parts.pop() {
        // `_form.html.haml` -> `form`
        let stem = file.split('.').next().unwrap_or_default().trim_start_matches('_');
        if !stem.is_empty() {
            parts.push(stem.to_string());
        }
    }

    parts.join(".")
}

fn normal_parts(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

/// JSON catalog nested as `<locale>.<scope>.<key>`.
pub struct CatalogWriter {
    file_path: PathBuf,
    data: Map<String, Value>,
}

impl CatalogWriter {
    /// Open an existing catalog or start an empty one
    pub fn open_or_create(path: &Path) -> Result<Self> {
        let data = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
            let value: Value = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse catalog: {}", path.display()))?;
            match value {
                Value::Object(map) => map,
                _ => bail!(ExtractError::Catalog {
                    path: path.to_path_buf(),
                    reason: "root must be an object".to_string(),
                }),
            }
        } else {
            Map::new()
        };

        Ok(Self {
            file_path: path.to_path_buf(),
            data,
        })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Keys already used in a scope, with their texts.
    ///
    /// Nested objects occupy their key too, so they are registered with an
    /// empty text that no candidate can match.
    pub fn existing_keys(&self, locale: &str, scope: &str) -> KeyRegistry {
        let node = scope_parts(locale, scope)
            .iter()
            .try_fold(&self.data, |map, part| map.get(*part)?.as_object());

        let entries = node.into_iter().flatten().map(|(key, value)| {
            (
                key.clone(),
                value.as_str().map(str::to_string).unwrap_or_default(),
            )
        });
        KeyRegistry::from_existing(entries)
    }

    /// Write every replaced line of a document into its scope.
    pub fn merge(&mut self, locale: &str, scope: &str, catalog: &CatalogMap) -> MergeStats {
        let mut stats = MergeStats::default();
        let base = scope_parts(locale, scope);

        for replacement in catalog.values().filter_map(|record| record.replacement()) {
            let mut path = base.clone();
            path.push(&replacement.key);
            let action = insert_nested(
                &mut self.data,
                &path,
                Value::String(replacement.original_text.clone()),
            );
            stats.count(action);
        }

        stats
    }

    /// Look up a dotted key, e.g. `en.users.form.save`.
    pub fn get(&self, key: &str) -> Option<&str> {
        let mut parts: Vec<&str> = key.split('.').collect();
        let leaf = parts.pop()?;
        let map = parts
            .iter()
            .try_fold(&self.data, |map, part| map.get(*part)?.as_object())?;
        map.get(leaf)?.as_str()
    }

    /// Save the catalog with pretty formatting
    ///
    /// Uses 2-space indentation and adds a trailing newline.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.file_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(&self.data).context("Failed to serialize JSON")?;

        fs::write(&self.file_path, format!("{}\n", content))
            .with_context(|| format!("Failed to write catalog: {}", self.file_path.display()))?;

        Ok(())
    }
}

fn scope_parts<'a>(locale: &'a str, scope: &'a str) -> Vec<&'a str> {
    std::iter::once(locale)
        .chain(scope.split('.'))
        .filter(|part| !part.is_empty())
        .collect()
}

/// Insert a value at a nested path, creating intermediate objects as needed
fn insert_nested(root: &mut Map<String, Value>, path: &[&str], value: Value) -> KeyAction {
    let Some((first, rest)) = path.split_first() else {
        return KeyAction::Kept;
    };

    if rest.is_empty() {
        let action = match root.get(*first) {
            None => KeyAction::Added,
            Some(existing) if *existing == value => KeyAction::Kept,
            Some(_) => KeyAction::Updated,
        };
        root.insert(first.to_string(), value);
        return action;
    }

    let next_level = root
        .entry(first.to_string())
        .or_insert_with(|| Value::Object(Map::new()));

    // A scalar in the way is replaced by the scope object
    if !next_level.is_object() {
        *next_level = Value::Object(Map::new());
    }

    match next_level {
        Value::Object(inner) => insert_nested(inner, rest, value),
        _ => KeyAction::Kept,
    }
}

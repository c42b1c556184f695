//! Managed-table registry
//!
//! A static lookup of `schema.table -> storage format` entries. Tables found
//! here are classified as managed and get their catalog qualifiers stripped
//! for a runtime lookup in the generated job; everything else stays generic.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::MigrateError;
use crate::model::TableFormat;

/// Case-insensitive registry of managed tables
#[derive(Debug, Clone, Default)]
pub struct ManagedTableRegistry {
    entries: HashMap<String, TableFormat>,
}

impl ManagedTableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from inline `("schema.table", format)` entries.
    pub fn from_entries(entries: &[(&str, TableFormat)]) -> Self {
        let mut registry = Self::new();
        for (qualified, format) in entries {
            registry.insert(qualified, *format);
        }
        registry
    }

    /// Load a registry from a key-value file: one `schema.table=format` entry
    /// per line, `#` comments and blank lines ignored.
    pub fn from_file(path: &Path) -> Result<Self, MigrateError> {
        let content = fs::read_to_string(path).map_err(|source| MigrateError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        let mut registry = Self::new();
        for (index, raw_line) in content.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let entry_error = |message: String| MigrateError::InvalidRegistryEntry {
                path: path.to_path_buf(),
                line: index + 1,
                message,
            };
            let (qualified, format_name) = line
                .split_once('=')
                .ok_or_else(|| entry_error("expected schema.table=format".to_string()))?;
            let qualified = qualified.trim();
            if !qualified.contains('.') {
                return Err(entry_error(format!(
                    "table name '{qualified}' is not schema-qualified"
                )));
            }
            let format = TableFormat::parse(format_name.trim())
                .ok_or_else(|| entry_error(format!("unknown format '{}'", format_name.trim())))?;
            registry.insert(qualified, format);
        }
        Ok(registry)
    }

    pub fn insert(&mut self, qualified: &str, format: TableFormat) {
        self.entries.insert(qualified.to_ascii_lowercase(), format);
    }

    /// Case-insensitive lookup by `(schema, table)`.
    pub fn lookup(&self, schema: &str, table: &str) -> Option<TableFormat> {
        let key = format!("{}.{}", schema, table).to_ascii_lowercase();
        self.entries.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

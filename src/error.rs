//! Error types for sql2spark

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during a migration run
#[derive(Error, Debug)]
pub enum MigrateError {
    #[error("Source SQL file missing or empty: {path}")]
    EmptyInput { path: PathBuf },

    #[error("SQL parse error in {context}: {message}")]
    SqlParse { context: String, message: String },

    #[error("Unknown SQL dialect: {name}")]
    UnknownDialect { name: String },

    #[error("Generated SQL references table binding '{alias}' with no extracted table")]
    UnresolvedAlias { alias: String },

    #[error("Template file not found: {path}")]
    TemplateNotFound { path: PathBuf },

    #[error("Invalid managed-table registry entry at {path}:{line}: {message}")]
    InvalidRegistryEntry {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Failed to read {path}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MigrateError {
    /// Build a parse error from a sqlparser error, tagging the fragment it came from.
    pub fn parse(context: impl Into<String>, err: sqlparser::parser::ParserError) -> Self {
        MigrateError::SqlParse {
            context: context.into(),
            message: err.to_string(),
        }
    }
}

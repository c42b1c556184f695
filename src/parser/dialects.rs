//! SQL dialect resolution by configuration name

use sqlparser::dialect::{dialect_from_str, Dialect};

use crate::error::MigrateError;

/// Default dialect for Athena/Trino-style source scripts
pub const DEFAULT_SOURCE_DIALECT: &str = "generic";

/// Resolve a dialect identifier ("generic", "hive", "ansi", ...) to a
/// sqlparser dialect. Unknown names fail up front, before any parsing.
pub fn resolve_dialect(name: &str) -> Result<Box<dyn Dialect>, MigrateError> {
    dialect_from_str(name).ok_or_else(|| MigrateError::UnknownDialect {
        name: name.to_string(),
    })
}

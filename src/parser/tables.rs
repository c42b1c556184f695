//! Table reference extraction

use core::ops::ControlFlow;

use sqlparser::ast::visit_relations;
use sqlparser::dialect::Dialect;
use sqlparser::parser::Parser;

use crate::error::MigrateError;
use crate::model::{CatalogKind, TableFormat, TableRef};
use crate::registry::ManagedTableRegistry;

/// Extract the deduplicated, ordered list of schema-qualified table
/// references from a SQL fragment.
///
/// Unqualified relation names are skipped: within a script they are CTE or
/// temp-view references, not source tables. The first occurrence of a
/// `(schema, table)` pair (case-insensitive) wins and fixes the generated
/// binding name; later case variants are dropped.
pub fn extract_tables(
    sql: &str,
    dialect: &dyn Dialect,
    registry: &ManagedTableRegistry,
) -> Result<Vec<TableRef>, MigrateError> {
    let statements =
        Parser::parse_sql(dialect, sql).map_err(|e| MigrateError::parse("table extraction", e))?;

    let mut tables: Vec<TableRef> = Vec::new();
    let _ = visit_relations(&statements, |relation| {
        let parts = &relation.0;
        if parts.len() >= 2 {
            let name = parts[parts.len() - 1].value.clone();
            let schema = parts[parts.len() - 2].value.clone();
            let already_seen = tables.iter().any(|t| t.matches(&schema, &name));
            if !already_seen {
                let (catalog_kind, format) = match registry.lookup(&schema, &name) {
                    Some(format) => (CatalogKind::KnownManaged, format),
                    None => (CatalogKind::Generic, TableFormat::Unknown),
                };
                tables.push(TableRef::new(schema, name, catalog_kind, format));
            }
        }
        ControlFlow::<()>::Continue(())
    });

    Ok(tables)
}

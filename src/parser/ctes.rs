//! Common-table-expression extraction

use sqlparser::ast::Statement;
use sqlparser::dialect::Dialect;
use sqlparser::parser::Parser;

use super::tables::extract_tables;
use crate::error::MigrateError;
use crate::model::CteDef;
use crate::registry::ManagedTableRegistry;

/// Extract CTE definitions in declaration order.
///
/// Each CTE gets its own table list, computed by re-running table extraction
/// over the inner query alone. A CTE referencing an earlier CTE by name is
/// not distinguished from a table reference here; since CTE names are
/// unqualified they simply never enter the table list.
pub fn extract_ctes(
    sql: &str,
    dialect: &dyn Dialect,
    registry: &ManagedTableRegistry,
) -> Result<Vec<CteDef>, MigrateError> {
    let statements =
        Parser::parse_sql(dialect, sql).map_err(|e| MigrateError::parse("CTE extraction", e))?;

    let mut ctes: Vec<CteDef> = Vec::new();
    for statement in &statements {
        let Statement::Query(query) = statement else {
            continue;
        };
        let Some(with) = &query.with else {
            continue;
        };
        for cte in &with.cte_tables {
            let name = cte.alias.name.value.clone();
            let inner_sql = cte.query.to_string();
            let tables = extract_tables(&inner_sql, dialect, registry)?;
            let position = ctes.len();
            ctes.push(CteDef::new(name, inner_sql, position, tables));
        }
    }

    Ok(ctes)
}

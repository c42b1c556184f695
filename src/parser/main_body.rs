//! Terminal query isolation

use sqlparser::ast::Statement;
use sqlparser::dialect::Dialect;
use sqlparser::parser::Parser;

use crate::error::MigrateError;

/// Strip the top-level WITH clause and return the serialized terminal query.
///
/// A script without a WITH clause comes back unchanged up to
/// reserialization.
pub fn extract_main_body(sql: &str, dialect: &dyn Dialect) -> Result<String, MigrateError> {
    let mut statements = Parser::parse_sql(dialect, sql)
        .map_err(|e| MigrateError::parse("main query extraction", e))?;

    for statement in &mut statements {
        if let Statement::Query(query) = statement {
            query.with = None;
        }
    }

    Ok(statements
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join("; "))
}

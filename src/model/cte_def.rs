//! CTE definitions extracted from the script

use super::TableRef;

/// A named common-table-expression definition.
///
/// `tables` is computed from `inner_sql` alone, never inherited from the
/// outer script. `position` is the zero-based declaration index and is kept
/// for tracing; generated execution order follows declaration order.
#[derive(Debug, Clone)]
pub struct CteDef {
    pub name: String,
    /// Inner query as declared in the source script (reserialized)
    pub inner_sql: String,
    /// Inner query after dialect conversion and placeholder injection
    pub rewritten_sql: String,
    pub position: usize,
    /// Schema-qualified tables referenced by this CTE's body
    pub tables: Vec<TableRef>,
    /// Generated query-repository method (Python source text)
    pub function_text: String,
    /// Generated view-creation call (Python source text)
    pub invocation_text: String,
}

impl CteDef {
    pub fn new(name: String, inner_sql: String, position: usize, tables: Vec<TableRef>) -> Self {
        Self {
            name,
            inner_sql,
            rewritten_sql: String::new(),
            position,
            tables,
            function_text: String::new(),
            invocation_text: String::new(),
        }
    }
}

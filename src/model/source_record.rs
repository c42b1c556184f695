//! The record threaded through the migration pipeline

use super::{CteDef, TableRef};

/// Pipeline state for one migration run.
///
/// Built once at pipeline start and extended additively by each stage; a run
/// owns its record exclusively, so there is no cross-run sharing. The date
/// replacement map is an ordered list of `(literal text, placeholder)` pairs;
/// insertion order is the order substitutions are applied in.
#[derive(Debug, Clone, Default)]
pub struct SourceRecord {
    pub raw_sql: String,
    pub cleaned_sql: String,
    /// Terminal query with the WITH clause stripped
    pub main_body: String,
    /// Terminal query after dialect conversion and placeholder injection
    pub new_main_body: String,
    pub tables: Vec<TableRef>,
    pub ctes: Vec<CteDef>,
    pub date_replacements: Vec<(String, String)>,
}

impl SourceRecord {
    pub fn new(raw_sql: String) -> Self {
        Self {
            raw_sql,
            ..Default::default()
        }
    }
}

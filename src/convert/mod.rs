//! Dialect conversion and placeholder injection
//!
//! Pass order here is load-bearing: the AST rewrite (qualifier stripping)
//! must run before any text-level substitution, because the later passes
//! inject brace-delimited placeholders that no SQL parser would accept.
//! Stripping qualified forms first leaves the bare table name as a safe,
//! low-collision anchor for the textual pass.

use core::ops::ControlFlow;

use regex::{NoExpand, Regex};
use sqlparser::ast::visit_relations_mut;
use sqlparser::dialect::Dialect;
use sqlparser::parser::Parser;

use crate::error::MigrateError;
use crate::infer::{COMPACT_PLACEHOLDER, ISO_PLACEHOLDER};
use crate::model::{CteDef, SourceRecord, TableRef};

/// Derived signature for a generated query method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodParams {
    /// Fragment text with cutoff placeholders rewritten to local variables
    pub sql: String,
    /// Python parameter list, always starting with `self`
    pub args_def: String,
    /// Call-site argument list, sourced from the job's time configuration
    pub args_call: String,
}

/// Convert one SQL fragment: strip qualifiers for known tables in the AST,
/// reserialize, then inject table and date placeholders as text.
pub fn convert_fragment(
    sql: &str,
    known_tables: &[TableRef],
    date_replacements: &[(String, String)],
    dialect: &dyn Dialect,
) -> Result<String, MigrateError> {
    let mut statements = Parser::parse_sql(dialect, sql)
        .map_err(|e| MigrateError::parse("syntax conversion", e))?;

    // 1. AST pass: drop catalog/schema qualifiers for known tables. The
    //    generated job supplies the fully qualified name via a runtime
    //    lookup instead.
    let _ = visit_relations_mut(&mut statements, |relation| {
        if relation.0.len() >= 2 {
            let last = relation.0.len() - 1;
            let is_known = {
                let name = &relation.0[last].value;
                let schema = &relation.0[last - 1].value;
                known_tables.iter().any(|t| t.matches(schema, name))
            };
            if is_known {
                let bare = relation.0[last].clone();
                relation.0 = vec![bare];
            }
        }
        ControlFlow::<()>::Continue(())
    });

    // 2. Serialize with stable formatting. sqlparser's writer is
    //    dialect-neutral; the Spark-specific parts of the output are
    //    carried by the placeholders, not the serializer.
    let mut converted = statements
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join("; ");

    // 3. Text pass: bind bare table names to their runtime variables. The
    //    match is case-insensitive and word-anchored: extraction dedups
    //    case variants into one entry, so every variant spelling must land
    //    on the same binding, while identifiers that merely contain a
    //    table name must not.
    for table in known_tables {
        let word = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(&table.name)))
            .expect("escaped identifier is a valid pattern");
        let binding = format!("{{{}}}", table.binding_var);
        converted = word.replace_all(&converted, NoExpand(&binding)).into_owned();
    }

    // 4. Text pass: cutoff-date placeholders, verbatim, in map order.
    for (from, to) in date_replacements {
        converted = converted.replace(from, to);
    }

    Ok(converted)
}

/// Inspect a converted fragment for cutoff placeholders and derive the
/// generated method's parameter list and call-site arguments. The ISO form
/// takes precedence when both placeholders are present.
pub fn derive_params(sql: &str) -> MethodParams {
    let mut adjusted = sql.to_string();
    let mut args_def = vec!["self".to_string()];
    let mut args_call: Vec<String> = Vec::new();

    if adjusted.contains(ISO_PLACEHOLDER) {
        adjusted = adjusted.replace(ISO_PLACEHOLDER, "'{cutoff_date_iso}'");
        args_def.push("cutoff_date_iso: str".to_string());
        args_call.push("self.time_config.cutoff_date_iso".to_string());
    } else if adjusted.contains(COMPACT_PLACEHOLDER) {
        adjusted = adjusted.replace(COMPACT_PLACEHOLDER, "{cutoff_date}");
        args_def.push("cutoff_date: str".to_string());
        args_call.push("self.time_config.cutoff_date".to_string());
    }

    MethodParams {
        sql: adjusted,
        args_def: args_def.join(", "),
        args_call: args_call.join(", "),
    }
}

/// Pipeline stage: convert every CTE body and the main query, and assemble
/// the generated method and invocation text per CTE.
pub fn convert_stage(
    mut record: SourceRecord,
    dialect: &dyn Dialect,
) -> Result<SourceRecord, MigrateError> {
    let date_replacements = record.date_replacements.clone();

    for cte in &mut record.ctes {
        let converted = convert_fragment(&cte.inner_sql, &cte.tables, &date_replacements, dialect)?;
        let params = derive_params(&converted);
        cte.rewritten_sql = params.sql.clone();
        cte.function_text = render_cte_method(cte, &params);
        cte.invocation_text = render_cte_invocation(cte, &params);
    }

    let converted_main =
        convert_fragment(&record.main_body, &record.tables, &date_replacements, dialect)?;
    record.new_main_body = derive_params(&converted_main).sql;

    Ok(record)
}

/// Render the Python query-repository method for one CTE.
fn render_cte_method(cte: &CteDef, params: &MethodParams) -> String {
    let mut bindings = String::new();
    for table in &cte.tables {
        bindings.push_str("\n        ");
        bindings.push_str(&table.accessor_stmt);
    }
    let body = params.sql.replace('\n', "\n        ");
    format!(
        r#"
    def get_cte_{name}({args}) -> str:
        """
        Materialized view: {name}
        Autogenerated during migration; edit the source SQL, not this file.
        """{bindings}
        return f"""
        {body}
        """"#,
        name = cte.name,
        args = params.args_def,
        bindings = bindings,
        body = body,
    )
}

/// Render the view-creation call for one CTE. Invocation order in the
/// generated job follows declaration order; callers guarantee that this
/// equals dependency order, since no inter-CTE analysis is performed.
fn render_cte_invocation(cte: &CteDef, params: &MethodParams) -> String {
    format!(
        "self._create_view(self.sql_repo.get_cte_{name}({args}), \"{name}\")",
        name = cte.name,
        args = params.args_call,
    )
}

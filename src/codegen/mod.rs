//! Target job synthesis from a tagged template

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::MigrateError;
use crate::model::SourceRecord;

/// Fixed prefix for generated job file names
pub const JOB_PREFIX: &str = "GL_JOB_";

/// Comma-joined `schema.table` list of every source table
pub const TAG_TABLE_LIST: &str = "#TAG_TABLE_LIST";
/// One generated query-repository method per CTE, declaration order
pub const TAG_CTE_METHODS: &str = "#TAG_CTE_METHODS";
/// One view-creation call per CTE, declaration order
pub const TAG_CTE_INVOCATIONS: &str = "#TAG_CTE_INVOCATIONS";
/// Table binding statements for the main query
pub const TAG_MAIN_TABLE_BINDINGS: &str = "#TAG_MAIN_TABLE_BINDINGS";
/// The converted terminal query
pub const TAG_FINAL_QUERY: &str = "#TAG_FINAL_QUERY";

static BINDING_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{(tbl_\w+)\}").unwrap());

/// Verify that every `{tbl_*}` token in the rewritten SQL resolves to an
/// extracted table. An orphan token means extraction and conversion
/// disagree; emitting the job anyway would produce code that fails at
/// runtime, so this aborts instead.
fn check_bindings(record: &SourceRecord) -> Result<(), MigrateError> {
    let mut known: Vec<&str> = record
        .tables
        .iter()
        .map(|t| t.binding_var.as_str())
        .collect();
    for cte in &record.ctes {
        known.extend(cte.tables.iter().map(|t| t.binding_var.as_str()));
    }

    let fragments = std::iter::once(record.new_main_body.as_str())
        .chain(record.ctes.iter().map(|c| c.rewritten_sql.as_str()));
    for fragment in fragments {
        for capture in BINDING_TOKEN.captures_iter(fragment) {
            let alias = &capture[1];
            if !known.iter().any(|k| *k == alias) {
                return Err(MigrateError::UnresolvedAlias {
                    alias: alias.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Render the job source by ordered, literal tag substitution.
pub fn render_job(template: &str, record: &SourceRecord) -> Result<String, MigrateError> {
    check_bindings(record)?;

    let table_list = record
        .tables
        .iter()
        .map(|t| t.qualified_name())
        .collect::<Vec<_>>()
        .join(",");
    // Method blocks carry their own class-level indentation; the column-0
    // tag only needs a bare newline between them.
    let cte_methods = record
        .ctes
        .iter()
        .map(|c| c.function_text.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    let cte_invocations = record
        .ctes
        .iter()
        .map(|c| c.invocation_text.as_str())
        .collect::<Vec<_>>()
        .join("\n        ");
    let main_bindings = record
        .tables
        .iter()
        .map(|t| t.accessor_stmt.as_str())
        .collect::<Vec<_>>()
        .join("\n        ");

    Ok(template
        .replace(TAG_TABLE_LIST, &table_list)
        .replace(TAG_CTE_METHODS, &cte_methods)
        .replace(TAG_CTE_INVOCATIONS, &cte_invocations)
        .replace(TAG_MAIN_TABLE_BINDINGS, &main_bindings)
        .replace(TAG_FINAL_QUERY, &record.new_main_body))
}

/// Load the template, render, and write the artifact.
///
/// The output file is written only after the full text is rendered in
/// memory, so a failed run never leaves a partial artifact behind.
pub fn synthesize(
    template_path: &Path,
    record: &SourceRecord,
    output_dir: &Path,
    business_name: &str,
) -> Result<PathBuf, MigrateError> {
    if !template_path.exists() {
        return Err(MigrateError::TemplateNotFound {
            path: template_path.to_path_buf(),
        });
    }
    let template = fs::read_to_string(template_path).map_err(|source| MigrateError::ReadError {
        path: template_path.to_path_buf(),
        source,
    })?;

    let rendered = render_job(&template, record)?;

    fs::create_dir_all(output_dir).map_err(|source| MigrateError::WriteError {
        path: output_dir.to_path_buf(),
        source,
    })?;
    let output_path = output_dir.join(format!("{JOB_PREFIX}{business_name}.py"));
    fs::write(&output_path, rendered).map_err(|source| MigrateError::WriteError {
        path: output_path.clone(),
        source,
    })?;

    Ok(output_path)
}

//! sql2spark: migrates Athena/Trino SQL scripts into parameterized PySpark jobs
//!
//! The pipeline is strictly linear: preprocess, extract tables, extract
//! CTEs, isolate the terminal query, infer the cutoff date, convert syntax,
//! synthesize the job file. Each stage consumes the shared record and
//! returns an extended one; the first unrecovered failure aborts the run
//! with no partial artifact on disk.

pub mod codegen;
pub mod convert;
pub mod error;
pub mod infer;
pub mod model;
pub mod parser;
pub mod registry;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;

pub use error::MigrateError;

/// Options for one migration run
#[derive(Debug, Clone)]
pub struct MigrateOptions {
    /// Path to the source SQL script
    pub sql_path: PathBuf,
    /// Business identifier used to name the generated job file
    pub business_name: String,
    /// Directory the artifact is written to (created if absent)
    pub output_dir: PathBuf,
    /// Path to the tagged job template
    pub template_path: PathBuf,
    /// Optional managed-table registry file
    pub tables_path: Option<PathBuf>,
    /// Dialect the source script is written in
    pub source_dialect: String,
    /// Enable verbose output
    pub verbose: bool,
}

/// Run the full migration pipeline and return the generated artifact path.
pub fn run_migration(options: MigrateOptions) -> Result<PathBuf> {
    let dialect = parser::resolve_dialect(&options.source_dialect)?;
    let registry = match &options.tables_path {
        Some(path) => registry::ManagedTableRegistry::from_file(path)?,
        None => registry::ManagedTableRegistry::new(),
    };

    // Step 1: read and preprocess the script
    let raw_sql = read_source(&options.sql_path)?;
    let mut record = model::SourceRecord::new(raw_sql);
    record.cleaned_sql = parser::clean_sql(&record.raw_sql);
    if options.verbose {
        println!(
            "Cleaned script: {} -> {} chars",
            record.raw_sql.len(),
            record.cleaned_sql.len()
        );
    }

    // Step 2: extract source tables
    record.tables = parser::extract_tables(&record.cleaned_sql, &*dialect, &registry)?;
    if options.verbose {
        println!("Found {} source tables", record.tables.len());
        for table in &record.tables {
            println!("  {} ({})", table.qualified_name(), table.format.as_str());
        }
    }

    // Step 3: extract CTE definitions
    record.ctes = parser::extract_ctes(&record.cleaned_sql, &*dialect, &registry)?;
    if options.verbose {
        println!("Found {} CTEs", record.ctes.len());
        for cte in &record.ctes {
            println!("  {} (position {})", cte.name, cte.position);
        }
    }

    // Step 4: isolate the terminal query
    record.main_body = parser::extract_main_body(&record.cleaned_sql, &*dialect)?;

    // Step 5: infer the cutoff date across every fragment
    let fragments: Vec<&str> = record
        .ctes
        .iter()
        .map(|c| c.inner_sql.as_str())
        .chain(std::iter::once(record.main_body.as_str()))
        .collect();
    record.date_replacements = infer::infer_date_replacements(&fragments, &*dialect);
    if options.verbose {
        println!("Cutoff-date replacements: {}", record.date_replacements.len());
    }

    // Step 6: convert syntax and derive method signatures
    let record = convert::convert_stage(record, &*dialect)?;

    // Step 7: synthesize the job file
    let output_path = codegen::synthesize(
        &options.template_path,
        &record,
        &options.output_dir,
        &options.business_name,
    )?;
    if options.verbose {
        println!("Generated {}", output_path.display());
    }

    Ok(output_path)
}

/// Read the source script, rejecting a missing or empty file before any
/// parsing is attempted.
fn read_source(path: &Path) -> Result<String, MigrateError> {
    if !path.exists() {
        return Err(MigrateError::EmptyInput {
            path: path.to_path_buf(),
        });
    }
    let raw = fs::read_to_string(path).map_err(|source| MigrateError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    if raw.trim().is_empty() {
        return Err(MigrateError::EmptyInput {
            path: path.to_path_buf(),
        });
    }
    Ok(raw)
}

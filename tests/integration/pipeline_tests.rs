//! End-to-end pipeline tests over the public API

use std::fs;

use pretty_assertions::assert_eq;
use sql2spark::{run_migration, MigrateError};

use crate::common::TestContext;

#[test]
fn test_end_to_end_managed_table_with_cutoff_date() {
    let ctx = TestContext::new();
    let sql = ctx.write_sql("SELECT * FROM db1.customers WHERE signup_date = DATE '2024-03-15'");
    let registry = ctx.write_registry("db1.customers=iceberg\n");

    let output_path = run_migration(ctx.options(sql, Some(registry))).unwrap();
    assert_eq!(
        output_path.file_name().unwrap().to_str().unwrap(),
        "GL_JOB_TEST.py"
    );

    let generated = fs::read_to_string(&output_path).unwrap();
    assert!(generated.contains("TABLES = \"db1.customers\""));
    assert!(generated.contains("tbl_customers = self._get_table(\"customers\")"));
    assert!(generated
        .contains("SELECT * FROM {tbl_customers} WHERE signup_date = DATE '{cutoff_date_iso}'"));
}

#[test]
fn test_case_variant_references_resolve_to_one_binding() {
    let ctx = TestContext::new();
    let sql = ctx.write_sql(
        "SELECT * FROM db1.customers AS x JOIN DB1.Customers AS y ON x.id = y.id",
    );

    let output_path = run_migration(ctx.options(sql, None)).unwrap();
    let generated = fs::read_to_string(&output_path).unwrap();

    assert!(generated.contains("TABLES = \"db1.customers\""));
    assert!(generated.contains(
        "SELECT * FROM {tbl_customers} AS x JOIN {tbl_customers} AS y ON x.id = y.id"
    ));
}

#[test]
fn test_output_contains_no_tag_markers() {
    let ctx = TestContext::new();
    let sql = ctx.write_sql(
        "WITH x AS (SELECT * FROM db1.customers) SELECT * FROM x WHERE d = '2025-01-01'",
    );

    let output_path = run_migration(ctx.options(sql, None)).unwrap();
    let generated = fs::read_to_string(&output_path).unwrap();
    assert!(!generated.contains("#TAG_"), "tag marker survived synthesis");
}

#[test]
fn test_cte_invocations_preserve_declaration_order() {
    let ctx = TestContext::new();
    let sql = ctx.write_sql(
        "WITH x AS (SELECT 1 AS a), y AS (SELECT * FROM x) SELECT * FROM y",
    );

    let output_path = run_migration(ctx.options(sql, None)).unwrap();
    let generated = fs::read_to_string(&output_path).unwrap();

    let invoke_x = generated
        .find("self.sql_repo.get_cte_x(")
        .expect("missing invocation for x");
    let invoke_y = generated
        .find("self.sql_repo.get_cte_y(")
        .expect("missing invocation for y");
    assert!(invoke_x < invoke_y, "invocations out of declaration order");

    let method_x = generated.find("def get_cte_x(").unwrap();
    let method_y = generated.find("def get_cte_y(").unwrap();
    assert!(method_x < method_y, "methods out of declaration order");
}

#[test]
fn test_dominant_date_parameterized_minority_date_untouched() {
    let ctx = TestContext::new();
    let sql = ctx.write_sql(
        "WITH x AS (SELECT * FROM db1.t WHERE a = '2025-01-01' AND b = '2025-01-01') \
         SELECT * FROM x WHERE c = '2025-01-01' AND fallback = '2025-06-01' AND dk = 20250101",
    );

    let output_path = run_migration(ctx.options(sql, None)).unwrap();
    let generated = fs::read_to_string(&output_path).unwrap();

    assert!(generated.contains("'{cutoff_date_iso}'"));
    assert!(!generated.contains("2025-01-01"));
    assert!(!generated.contains("20250101"));
    // the minority date stays a hardcoded literal
    assert!(generated.contains("'2025-06-01'"));
}

#[test]
fn test_script_without_dates_needs_no_parameters() {
    let ctx = TestContext::new();
    let sql = ctx.write_sql("WITH x AS (SELECT * FROM db1.t) SELECT * FROM x");

    let output_path = run_migration(ctx.options(sql, None)).unwrap();
    let generated = fs::read_to_string(&output_path).unwrap();
    assert!(generated.contains("def get_cte_x(self) -> str:"));
    assert!(!generated.contains("cutoff_date"));
}

#[test]
fn test_comments_are_stripped_before_analysis() {
    let ctx = TestContext::new();
    let sql = ctx.write_sql(
        "-- cutoff was '2020-12-31' back then\nSELECT * FROM db1.t WHERE d = '2025-01-01'",
    );

    let output_path = run_migration(ctx.options(sql, None)).unwrap();
    let generated = fs::read_to_string(&output_path).unwrap();
    // the commented-out date must not influence dominance
    assert!(generated.contains("'{cutoff_date_iso}'"));
    assert!(!generated.contains("2020-12-31"));
}

#[test]
fn test_missing_source_file_is_empty_input() {
    let ctx = TestContext::new();
    let err = run_migration(ctx.options(ctx.dir.join("absent.sql"), None)).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<MigrateError>(),
        Some(MigrateError::EmptyInput { .. })
    ));
    assert!(!ctx.output_dir().exists(), "no artifact expected on failure");
}

#[test]
fn test_blank_source_file_is_empty_input() {
    let ctx = TestContext::new();
    let sql = ctx.write_sql("   \n\t\n");
    let err = run_migration(ctx.options(sql, None)).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<MigrateError>(),
        Some(MigrateError::EmptyInput { .. })
    ));
}

#[test]
fn test_invalid_sql_is_fatal_with_no_artifact() {
    let ctx = TestContext::new();
    let sql = ctx.write_sql("THIS IS NOT SQL ((");
    let err = run_migration(ctx.options(sql, None)).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<MigrateError>(),
        Some(MigrateError::SqlParse { .. })
    ));
    assert!(!ctx.output_dir().exists(), "no artifact expected on failure");
}

#[test]
fn test_missing_template_reports_path() {
    let ctx = TestContext::new();
    let sql = ctx.write_sql("SELECT * FROM db1.t");
    let mut options = ctx.options(sql, None);
    options.template_path = ctx.dir.join("absent_template.py");

    let err = run_migration(options).unwrap_err();
    match err.downcast_ref::<MigrateError>() {
        Some(MigrateError::TemplateNotFound { path }) => {
            assert!(path.ends_with("absent_template.py"));
        }
        other => panic!("expected TemplateNotFound, got {other:?}"),
    }
    assert!(!ctx.output_dir().exists(), "no artifact expected on failure");
}

#[test]
fn test_unknown_dialect_fails_up_front() {
    let ctx = TestContext::new();
    let sql = ctx.write_sql("SELECT 1");
    let mut options = ctx.options(sql, None);
    options.source_dialect = "klingon".to_string();

    let err = run_migration(options).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<MigrateError>(),
        Some(MigrateError::UnknownDialect { .. })
    ));
}

#[test]
fn test_unregistered_tables_still_migrate() {
    let ctx = TestContext::new();
    let sql = ctx.write_sql("SELECT * FROM db9.audit_log");

    let output_path = run_migration(ctx.options(sql, None)).unwrap();
    let generated = fs::read_to_string(&output_path).unwrap();
    // still extracted and bound, just classified as generic
    assert!(generated.contains("TABLES = \"db9.audit_log\""));
    assert!(generated.contains("{tbl_audit_log}"));
}

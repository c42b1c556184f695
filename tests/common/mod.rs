//! Common test utilities for sql2spark tests

use std::fs;
use std::path::PathBuf;

use sql2spark::MigrateOptions;
use tempfile::TempDir;

/// Minimal tagged template exercising all five markers
pub const MINIMAL_TEMPLATE: &str = r##"TABLES = "#TAG_TABLE_LIST"
#TAG_CTE_METHODS
#TAG_CTE_INVOCATIONS
#TAG_MAIN_TABLE_BINDINGS
#TAG_FINAL_QUERY
"##;

/// Test context with a temporary directory for isolated runs
pub struct TestContext {
    /// Kept to prevent temp directory cleanup until TestContext is dropped
    _temp_dir: TempDir,
    pub dir: PathBuf,
}

impl TestContext {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dir = temp_dir.path().to_path_buf();
        fs::write(dir.join("template.py"), MINIMAL_TEMPLATE).expect("Failed to write template");
        Self {
            _temp_dir: temp_dir,
            dir,
        }
    }

    pub fn write_sql(&self, content: &str) -> PathBuf {
        let path = self.dir.join("query.sql");
        fs::write(&path, content).expect("Failed to write SQL file");
        path
    }

    pub fn write_registry(&self, content: &str) -> PathBuf {
        let path = self.dir.join("tables.conf");
        fs::write(&path, content).expect("Failed to write registry file");
        path
    }

    pub fn output_dir(&self) -> PathBuf {
        self.dir.join("output")
    }

    pub fn options(&self, sql_path: PathBuf, tables_path: Option<PathBuf>) -> MigrateOptions {
        MigrateOptions {
            sql_path,
            business_name: "TEST".to_string(),
            output_dir: self.output_dir(),
            template_path: self.dir.join("template.py"),
            tables_path,
            source_dialect: "generic".to_string(),
            verbose: false,
        }
    }
}

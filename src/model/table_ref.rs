//! Source table references

/// Storage format of a source table, as recorded in the managed-table registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Iceberg,
    Parquet,
    Delta,
    Hive,
    Unknown,
}

impl TableFormat {
    /// Parse a registry value ("iceberg", "parquet", ...). Case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "iceberg" => Some(TableFormat::Iceberg),
            "parquet" => Some(TableFormat::Parquet),
            "delta" => Some(TableFormat::Delta),
            "hive" => Some(TableFormat::Hive),
            "unknown" => Some(TableFormat::Unknown),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TableFormat::Iceberg => "iceberg",
            TableFormat::Parquet => "parquet",
            TableFormat::Delta => "delta",
            TableFormat::Hive => "hive",
            TableFormat::Unknown => "unknown",
        }
    }
}

/// Which catalog the generated job resolves a table through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    /// Present in the managed-table registry; resolved via the managed catalog
    KnownManaged,
    /// Not registered; resolved via the default session catalog
    Generic,
}

impl CatalogKind {
    pub fn catalog_name(&self) -> &'static str {
        match self {
            CatalogKind::KnownManaged => "glue_catalog",
            CatalogKind::Generic => "spark_catalog",
        }
    }
}

/// A deduplicated reference to a schema-qualified source table.
///
/// Identity is the case-insensitive `(schema, name)` pair; a table list never
/// holds two entries with the same key. Created once during extraction and
/// immutable afterwards.
#[derive(Debug, Clone)]
pub struct TableRef {
    /// Schema (database) name, case-preserved from the script
    pub schema: String,
    /// Table name, case-preserved from the script
    pub name: String,
    pub catalog_kind: CatalogKind,
    pub format: TableFormat,
    /// Variable the generated job binds the resolved table name to
    pub binding_var: String,
    /// Python statement that performs the runtime lookup
    pub accessor_stmt: String,
}

impl TableRef {
    pub fn new(schema: String, name: String, catalog_kind: CatalogKind, format: TableFormat) -> Self {
        let binding_var = format!("tbl_{name}");
        let accessor_stmt = format!("{binding_var} = self._get_table(\"{name}\")");
        Self {
            schema,
            name,
            catalog_kind,
            format,
            binding_var,
            accessor_stmt,
        }
    }

    /// `schema.table`, as used in the generated job's table list
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    /// Case-insensitive identity check against a `(schema, name)` pair
    pub fn matches(&self, schema: &str, name: &str) -> bool {
        self.schema.eq_ignore_ascii_case(schema) && self.name.eq_ignore_ascii_case(name)
    }
}

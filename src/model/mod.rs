//! Pipeline data model

mod cte_def;
mod source_record;
mod table_ref;

pub use cte_def::CteDef;
pub use source_record::SourceRecord;
pub use table_ref::{CatalogKind, TableFormat, TableRef};

//! SQL structural analysis

pub mod ctes;
pub mod dialects;
pub mod main_body;
pub mod preprocess;
pub mod tables;

pub use ctes::extract_ctes;
pub use dialects::resolve_dialect;
pub use main_body::extract_main_body;
pub use preprocess::clean_sql;
pub use tables::extract_tables;

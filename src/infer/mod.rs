//! Heuristic inference over literal evidence

pub mod dates;

pub use dates::{infer_date_replacements, COMPACT_PLACEHOLDER, ISO_PLACEHOLDER};

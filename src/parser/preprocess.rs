//! Script preprocessing: comment stripping and whitespace normalization

use once_cell::sync::Lazy;
use regex::Regex;

static LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"--[^\n]*").unwrap());
static BLOCK_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Remove line and block comments and collapse whitespace runs to a single
/// space. Idempotent: cleaning already-cleaned text is a no-op.
pub fn clean_sql(sql: &str) -> String {
    let without_line = LINE_COMMENT.replace_all(sql, "");
    let without_block = BLOCK_COMMENT.replace_all(&without_line, "");
    WHITESPACE_RUN
        .replace_all(&without_block, " ")
        .trim()
        .to_string()
}

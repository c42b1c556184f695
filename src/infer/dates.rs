//! Cutoff-date inference from hardcoded literals
//!
//! Production scripts repeat their cutoff date: it shows up in WHERE
//! filters, default-date fallbacks, and audit stamps. The most frequent
//! date literal is therefore taken as the cutoff parameter the generated
//! job should accept at run time; other distinct dates are assumed to be
//! unrelated constants and left alone.

use core::ops::ControlFlow;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use sqlparser::ast::{visit_expressions, Expr, Value};
use sqlparser::dialect::Dialect;
use sqlparser::parser::Parser;

/// Placeholder for the ISO (`YYYY-MM-DD`) cutoff form
pub const ISO_PLACEHOLDER: &str = "{time_config.cutoff_date_iso}";
/// Placeholder for the compact (`YYYYMMDD`) cutoff form
pub const COMPACT_PLACEHOLDER: &str = "{time_config.cutoff_date}";

static ISO_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());
static COMPACT_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{8}$").unwrap());

/// Interpret a literal as a date in one of the two recognized shapes.
/// Shape-matching text with an invalid calendar date (e.g. `2025-13-40`)
/// is rejected.
fn parse_date_literal(value: &str) -> Option<NaiveDate> {
    if ISO_SHAPE.is_match(value) {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
    } else if COMPACT_SHAPE.is_match(value) {
        NaiveDate::parse_from_str(value, "%Y%m%d").ok()
    } else {
        None
    }
}

/// Collect `(literal text, date)` pairs from one fragment.
///
/// Best-effort: a fragment that fails to parse is reported and contributes
/// nothing. Date inference is a quality heuristic, not a correctness
/// requirement, so it must not abort the pipeline.
fn scan_fragment(sql: &str, dialect: &dyn Dialect) -> Vec<(String, NaiveDate)> {
    let statements = match Parser::parse_sql(dialect, sql) {
        Ok(statements) => statements,
        Err(e) => {
            eprintln!("warning: skipping fragment during date inference: {e}");
            return Vec::new();
        }
    };

    let mut found: Vec<(String, NaiveDate)> = Vec::new();
    let _ = visit_expressions(&statements, |expr: &Expr| {
        let literal = match expr {
            Expr::Value(Value::SingleQuotedString(s)) => Some(s),
            Expr::Value(Value::Number(s, _)) => Some(s),
            // DATE '2024-03-15' and friends
            Expr::TypedString { value, .. } => Some(value),
            _ => None,
        };
        if let Some(text) = literal {
            if let Some(date) = parse_date_literal(text) {
                found.push((text.clone(), date));
            }
        }
        ControlFlow::<()>::Continue(())
    });
    found
}

/// Build the textual replacement map for the dominant date across all
/// fragments.
///
/// Ties are broken by scan order: frequency counting is insertion-ordered,
/// and only a strictly greater count displaces the current dominant date.
/// Returns an empty map when no date literals are found.
pub fn infer_date_replacements(fragments: &[&str], dialect: &dyn Dialect) -> Vec<(String, String)> {
    let mut candidates: Vec<(String, NaiveDate)> = Vec::new();
    for fragment in fragments {
        candidates.extend(scan_fragment(fragment, dialect));
    }
    if candidates.is_empty() {
        return Vec::new();
    }

    let mut counts: Vec<(NaiveDate, usize)> = Vec::new();
    for (_, date) in &candidates {
        match counts.iter_mut().find(|(seen, _)| seen == date) {
            Some((_, count)) => *count += 1,
            None => counts.push((*date, 1)),
        }
    }
    let mut dominant = counts[0];
    for &(date, count) in &counts[1..] {
        if count > dominant.1 {
            dominant = (date, count);
        }
    }

    let mut replacements: Vec<(String, String)> = Vec::new();
    for (text, date) in &candidates {
        if *date != dominant.0 {
            continue;
        }
        if text.contains('-') {
            // The quoted form must precede the bare form so the later text
            // substitution consumes the quotes along with the literal.
            add_replacement(&mut replacements, format!("'{text}'"), ISO_PLACEHOLDER);
            add_replacement(&mut replacements, text.clone(), ISO_PLACEHOLDER);
        } else {
            add_replacement(&mut replacements, text.clone(), COMPACT_PLACEHOLDER);
        }
    }
    replacements
}

fn add_replacement(map: &mut Vec<(String, String)>, from: String, to: &str) {
    if !map.iter().any(|(existing, _)| *existing == from) {
        map.push((from, to.to_string()));
    }
}

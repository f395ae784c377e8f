//! Row-preserving stages: `sort by`, `take`/`limit`, `project`.

use std::fmt;

use serde::Serialize;

use crate::error::{KlqResult, QueryError};
use crate::value::{sort_cmp, Row};

/// Sorting order for `sort by`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => f.write_str("asc"),
            SortOrder::Desc => f.write_str("desc"),
        }
    }
}

/// Parse `field [asc|desc]`. Any direction other than `desc` sorts ascending.
pub fn parse_sort(arg: &str) -> (String, SortOrder) {
    let mut parts = arg.split_whitespace();
    let field = parts.next().unwrap_or_default().to_string();
    let order = match parts.next() {
        Some(dir) if dir.eq_ignore_ascii_case("desc") => SortOrder::Desc,
        Some(dir) if !dir.eq_ignore_ascii_case("asc") => {
            tracing::debug!("Unrecognized sort direction '{dir}', using asc");
            SortOrder::Asc
        }
        _ => SortOrder::Asc,
    };
    (field, order)
}

/// Parse the count of a `take`/`limit` segment (the token after the keyword).
///
/// The whole token must be an integer: `take 3.5` and `take 5x` are errors
/// rather than being cut down to their leading digits.
pub fn parse_take(segment: &str) -> KlqResult<i64> {
    segment
        .split_whitespace()
        .nth(1)
        .and_then(|n| n.parse::<i64>().ok())
        .ok_or_else(|| QueryError::InvalidTakeArgument(segment.to_string()))
}

/// Parse a comma-separated field list, dropping empty entries.
pub fn parse_project(arg: &str) -> Vec<String> {
    arg.split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}

/// Stable ascending sort by `field`; `desc` reverses the sorted rows.
pub fn sort_rows(mut rows: Vec<Row>, field: &str, order: SortOrder) -> Vec<Row> {
    rows.sort_by(|a, b| sort_cmp(a.get(field), b.get(field)));
    if order == SortOrder::Desc {
        rows.reverse();
    }
    rows
}

/// Keep the first `n` rows. Zero or negative counts keep nothing.
pub fn take_rows(mut rows: Vec<Row>, n: i64) -> Vec<Row> {
    let n = usize::try_from(n).unwrap_or(0);
    rows.truncate(n);
    rows
}

/// Narrow every row to `fields`, in that order. Missing fields are omitted.
pub fn project_rows(rows: Vec<Row>, fields: &[String]) -> Vec<Row> {
    rows.iter()
        .map(|row| {
            let mut out = Row::with_capacity(fields.len());
            for field in fields {
                if let Some(v) = row.get(field) {
                    out.insert(field.as_str(), v.clone());
                }
            }
            out
        })
        .collect()
}

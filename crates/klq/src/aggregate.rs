//! Reshaping stages: `summarize count() by`, `distinct`, `count`.

use std::collections::{HashMap, HashSet};

use crate::error::{KlqResult, QueryError};
use crate::value::{to_str, Row, Value};

/// Name of the column holding group sizes.
pub const COUNT_FIELD: &str = "count";

/// Parse `count() by <field>`, returning the group field.
///
/// `count()` and `by` match case-insensitively; the field may not be empty.
pub fn parse_summarize(arg: &str) -> KlqResult<String> {
    let invalid = || QueryError::InvalidSummarizeClause(arg.to_string());

    let rest = strip_keyword(arg.trim(), "count()").ok_or_else(invalid)?;
    let rest = strip_keyword(rest.trim_start(), "by").ok_or_else(invalid)?;
    let field = rest.trim();
    if field.is_empty() {
        return Err(invalid());
    }
    Ok(field.to_string())
}

/// Strip a case-insensitive keyword that must be followed by whitespace.
fn strip_keyword<'a>(s: &'a str, keyword: &str) -> Option<&'a str> {
    let head = s.get(..keyword.len())?;
    if !head.eq_ignore_ascii_case(keyword) {
        return None;
    }
    let rest = &s[keyword.len()..];
    rest.starts_with(char::is_whitespace).then_some(rest)
}

/// Group rows by the stringified `field` value and count each group.
///
/// Groups are ordered by count descending, then by key ascending.
pub fn summarize_count(rows: &[Row], field: &str) -> Vec<Row> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, usize)> = Vec::new();

    for row in rows {
        let key = to_str(row.get(field));
        match index.get(&key) {
            Some(&i) => groups[i].1 += 1,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, 1));
            }
        }
    }

    groups.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    groups
        .into_iter()
        .map(|(key, n)| {
            let mut out = Row::with_capacity(2);
            out.insert(field, key);
            out.insert(COUNT_FIELD, n);
            out
        })
        .collect()
}

/// First occurrence of each stringified `field` value, as single-field rows.
pub fn distinct(rows: &[Row], field: &str) -> Vec<Row> {
    let mut seen = HashSet::new();
    rows.iter()
        .map(|row| to_str(row.get(field)))
        .filter(|v| seen.insert(v.clone()))
        .map(|v| {
            let mut out = Row::with_capacity(1);
            out.insert(field, Value::String(v));
            out
        })
        .collect()
}

/// Collapse the row-set into `{count: N}`.
pub fn count(rows: &[Row]) -> Vec<Row> {
    let mut out = Row::with_capacity(1);
    out.insert(COUNT_FIELD, rows.len());
    vec![out]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sev(values: &[&str]) -> Vec<Row> {
        values
            .iter()
            .map(|s| [("severity", Value::from(*s))].into_iter().collect())
            .collect()
    }

    #[test]
    fn test_parse_summarize() {
        assert_eq!(parse_summarize("count() by tactic").unwrap(), "tactic");
        assert_eq!(parse_summarize("COUNT()  BY  tactic ").unwrap(), "tactic");
        for bad in [
            "count by tactic",
            "count() tactic",
            "count() by ",
            "sum(x) by y",
            "count()by x",
        ] {
            let err = parse_summarize(bad).unwrap_err();
            assert!(matches!(err, QueryError::InvalidSummarizeClause(_)), "{bad}");
        }
    }

    #[test]
    fn test_summarize_orders_by_count_then_key() {
        let rows = sev(&["critical", "high", "low", "high", "critical", "high", "low"]);
        let out = summarize_count(&rows, "severity");
        let got: Vec<(String, String)> = out
            .iter()
            .map(|r| (r.get("severity").unwrap().to_string(), r.get("count").unwrap().to_string()))
            .collect();
        assert_eq!(
            got,
            vec![
                ("high".to_string(), "3".to_string()),
                ("critical".to_string(), "2".to_string()),
                ("low".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_summarize_missing_field_groups_as_empty() {
        let mut rows = sev(&["high"]);
        rows.push(Row::new());
        let out = summarize_count(&rows, "severity");
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].get("severity"), Some(&Value::from("")));
    }

    #[test]
    fn test_summarize_by_count_field() {
        let rows: Vec<Row> = vec![[("count", Value::from(5))].into_iter().collect()];
        let out = summarize_count(&rows, "count");
        assert_eq!(out[0].len(), 1);
        assert_eq!(out[0].get("count"), Some(&Value::from(1)));
    }

    #[test]
    fn test_distinct_first_seen_order() {
        let rows = sev(&["low", "high", "low", "critical", "high"]);
        let out = distinct(&rows, "severity");
        let got: Vec<String> = out.iter().map(|r| r.get("severity").unwrap().to_string()).collect();
        assert_eq!(got, vec!["low", "high", "critical"]);
    }

    #[test]
    fn test_distinct_stringifies() {
        let rows: Vec<Row> = vec![
            [("year", Value::from(2024))].into_iter().collect(),
            [("year", Value::from("2024"))].into_iter().collect(),
        ];
        let out = distinct(&rows, "year");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].get("year"), Some(&Value::from("2024")));
    }

    #[test]
    fn test_count() {
        assert_eq!(count(&sev(&["a", "b"]))[0].get("count"), Some(&Value::from(2)));
        assert_eq!(count(&[])[0].get("count"), Some(&Value::from(0)));
    }
}

//! Text rendering of query results and presentation-only re-sorting.

use klq::value::{sort_cmp, to_number};
use klq::{QueryResult, Row, SortOrder, Value};

/// Widest a rendered cell may get before it is cut.
const MAX_CELL_WIDTH: usize = 60;

/// Links longer than this are shortened.
const MAX_LINK_WIDTH: usize = 50;

/// Display form of one cell.
///
/// Null and empty render as `-`; lists are comma-joined; fields whose name
/// contains `usd` get `$` shorthand; `cvss` shows one decimal.
pub fn format_value(value: Option<&Value>, field: &str) -> String {
    let value = match value {
        None | Some(Value::Null) => return "-".to_string(),
        Some(Value::String(s)) if s.is_empty() => return "-".to_string(),
        Some(v) => v,
    };
    if let Value::List(_) = value {
        return value.to_string();
    }

    if field.contains("usd") {
        if let Some(n) = to_number(Some(value)).filter(|n| *n > 0.0) {
            return format_usd(n);
        }
    }

    if field == "cvss" {
        if let Some(n) = to_number(Some(value)).filter(|n| !n.is_nan()) {
            return format!("{n:.1}");
        }
    }

    let text = value.to_string();
    if (text.starts_with("http://") || text.starts_with("https://"))
        && text.chars().count() > MAX_LINK_WIDTH
    {
        let head: String = text.chars().take(MAX_LINK_WIDTH).collect();
        return format!("{head}...");
    }
    text
}

fn format_usd(n: f64) -> String {
    if n >= 1e9 {
        format!("${:.1}B", n / 1e9)
    } else if n >= 1e6 {
        format!("${:.0}M", n / 1e6)
    } else if n >= 1e3 {
        format!("${:.0}K", n / 1e3)
    } else {
        format!("${}", Value::Number(n))
    }
}

/// Column names, taken from the first row.
pub fn columns(rows: &[Row]) -> Vec<String> {
    rows.first()
        .map(|r| r.keys().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Re-sort already computed rows by a column, as a table header click would.
pub fn sort_rows(rows: &[Row], column: &str, order: SortOrder) -> Vec<Row> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| sort_cmp(a.get(column), b.get(column)));
    if order == SortOrder::Desc {
        sorted.reverse();
    }
    sorted
}

/// Render a result as an aligned text table with a summary footer.
pub fn render_result(result: &QueryResult) -> String {
    if let Some(error) = &result.error {
        return format!("Error: {error}");
    }
    if result.rows.is_empty() {
        if result.table_name.is_empty() {
            return String::new();
        }
        return "No results. Try a different query or check the table name.".to_string();
    }
    render_rows(&result.rows, &result.table_name)
}

/// Render rows under `table` as an aligned text table.
pub fn render_rows(rows: &[Row], table: &str) -> String {
    let cols = columns(rows);
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            cols.iter()
                .map(|c| clip(&format_value(row.get(c), c)))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = cols
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(c.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    push_line(&mut out, &cols, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for row in &cells {
        push_line(&mut out, row, &widths);
    }

    out.push_str(&format!(
        "\n{} result{} from {} · {} column{}",
        rows.len(),
        plural(rows.len()),
        table,
        cols.len(),
        plural(cols.len())
    ));
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!("{cell:<w$}", w = *w))
        .collect();
    out.push_str(padded.join("  ").trim_end());
    out.push('\n');
}

fn clip(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_WIDTH {
        return text.to_string();
    }
    let head: String = text.chars().take(MAX_CELL_WIDTH - 3).collect();
    format!("{head}...")
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs.iter().cloned().collect()
    }

    #[test]
    fn test_format_empty_and_lists() {
        assert_eq!(format_value(None, "x"), "-");
        assert_eq!(format_value(Some(&Value::Null), "x"), "-");
        assert_eq!(format_value(Some(&Value::from("")), "x"), "-");
        let tags = Value::List(vec!["a".into(), "b".into()]);
        assert_eq!(format_value(Some(&tags), "tags"), "a, b");
    }

    #[test]
    fn test_format_usd() {
        let fmt = |n: f64| format_value(Some(&Value::from(n)), "funding_total_usd");
        assert_eq!(fmt(1_260_000_000.0), "$1.3B");
        assert_eq!(fmt(350_000_000.0), "$350M");
        assert_eq!(fmt(12_000.0), "$12K");
        assert_eq!(fmt(950.0), "$950");
        assert_eq!(fmt(0.0), "0");
        assert_eq!(
            format_value(Some(&Value::from("unknown")), "amount_usd"),
            "unknown"
        );
    }

    #[test]
    fn test_format_cvss_and_links() {
        assert_eq!(format_value(Some(&Value::from(9)), "cvss"), "9.0");
        assert_eq!(format_value(Some(&Value::from("7.26")), "cvss"), "7.3");
        let url = format!("https://example.com/{}", "a".repeat(60));
        let shown = format_value(Some(&Value::from(url.as_str())), "link");
        assert_eq!(shown.chars().count(), 53);
        assert!(shown.ends_with("..."));
    }

    #[test]
    fn test_sort_rows_is_presentation_only() {
        let rows = vec![
            row(&[("name", "b".into()), ("n", 2.into())]),
            row(&[("name", "a".into()), ("n", 10.into())]),
        ];
        let asc = sort_rows(&rows, "n", SortOrder::Asc);
        assert_eq!(asc[0].get("name"), Some(&Value::from("b")));
        let desc = sort_rows(&rows, "name", SortOrder::Desc);
        assert_eq!(desc[0].get("name"), Some(&Value::from("b")));
        assert_eq!(rows[0].get("name"), Some(&Value::from("b")));
    }

    #[test]
    fn test_render_table() {
        let result = QueryResult {
            rows: vec![
                row(&[("device", "N1".into()), ("channels", 1024.into())]),
                row(&[("device", "Muse".into())]),
            ],
            table_name: "devices".to_string(),
            error: None,
        };
        let text = render_result(&result);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "device  channels");
        assert_eq!(lines[1], "------  --------");
        assert_eq!(lines[2], "N1      1024");
        assert_eq!(lines[3], "Muse    -");
        assert_eq!(lines[5], "2 results from devices · 2 columns");
    }

    #[test]
    fn test_render_error_and_empty() {
        let err = QueryResult {
            rows: vec![],
            table_name: "x".to_string(),
            error: Some("Unknown table \"x\". Available: a".to_string()),
        };
        assert_eq!(render_result(&err), "Error: Unknown table \"x\". Available: a");
        assert_eq!(render_result(&QueryResult::default()), "");
        let none = QueryResult {
            table_name: "a".to_string(),
            ..QueryResult::default()
        };
        assert!(render_result(&none).starts_with("No results."));
    }
}

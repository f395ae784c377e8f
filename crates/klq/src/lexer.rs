//! Query tokenizing: stage splitting and `where` operator scanning.
//!
//! Quoting rule: a `"` or `'` opens a literal only at the start of a token
//! (start of input, after whitespace, or after one of `= < > ! , | (`) and
//! only if a matching quote follows later in the input; the literal runs to
//! that quote. Inside a literal, `|` does not split stages and operators are
//! not recognized, so `name contains "a|b"` and `note == 'x>y'` read as
//! written. An apostrophe inside a bare word (`O'Brien`) or a quote that is
//! never closed (`name contains 's | count`) is plain text.

use crate::predicate::CompareOp;

/// Symbolic operators, two-character forms first so `>=` is never read as `>`.
const SYMBOLIC_OPS: [(&str, CompareOp); 6] = [
    ("!=", CompareOp::Ne),
    (">=", CompareOp::Ge),
    ("<=", CompareOp::Le),
    ("==", CompareOp::Eq),
    (">", CompareOp::Gt),
    ("<", CompareOp::Lt),
];

/// Word operators; these need whitespace on both sides.
const WORD_OPS: [(&str, CompareOp); 4] = [
    ("!contains", CompareOp::NotContains),
    ("contains", CompareOp::Contains),
    ("startswith", CompareOp::StartsWith),
    ("has", CompareOp::Has),
];

/// Tracks whether the scan is inside a quoted literal.
#[derive(Debug, Default)]
struct QuoteState {
    open: Option<char>,
}

impl QuoteState {
    /// Feed one character, with `rest` the input after it. Returns `true`
    /// if it belongs to a literal, delimiters included.
    fn step(&mut self, prev: Option<char>, c: char, rest: &str) -> bool {
        match self.open {
            Some(q) => {
                if c == q {
                    self.open = None;
                }
                true
            }
            None if (c == '"' || c == '\'') && opens_literal(prev) && rest.contains(c) => {
                self.open = Some(c);
                true
            }
            None => false,
        }
    }
}

fn opens_literal(prev: Option<char>) -> bool {
    match prev {
        None => true,
        Some(p) => p.is_whitespace() || matches!(p, '=' | '<' | '>' | '!' | ',' | '|' | '('),
    }
}

/// Split a query into trimmed `|`-delimited segments.
///
/// Always yields at least one segment; the first names the table.
pub fn split_stages(query: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut quotes = QuoteState::default();
    let mut prev = None;
    let mut start = 0;

    for (i, c) in query.char_indices() {
        let rest = &query[i + c.len_utf8()..];
        if !quotes.step(prev, c, rest) && c == '|' {
            segments.push(query[start..i].trim());
            start = i + c.len_utf8();
        }
        prev = Some(c);
    }
    segments.push(query[start..].trim());
    segments
}

/// The three parts of a `where` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereTokens<'a> {
    pub field: &'a str,
    pub op: CompareOp,
    /// Raw right-hand side, trimmed but not yet parsed as a literal.
    pub value: &'a str,
}

/// Scan a `where` clause left to right and split it at the first operator.
///
/// The field must be non-empty. Returns `None` if no operator is found
/// outside quoted literals.
pub fn scan_where(clause: &str) -> Option<WhereTokens<'_>> {
    let mut quotes = QuoteState::default();
    let mut prev: Option<char> = None;

    for (i, c) in clause.char_indices() {
        if quotes.step(prev, c, &clause[i + c.len_utf8()..]) {
            prev = Some(c);
            continue;
        }

        let field = clause[..i].trim();
        if !field.is_empty() {
            let rest = &clause[i..];

            if let Some((sym, op)) = SYMBOLIC_OPS.iter().find(|(sym, _)| rest.starts_with(sym)) {
                return Some(WhereTokens {
                    field,
                    op: *op,
                    value: rest[sym.len()..].trim(),
                });
            }

            if prev.is_some_and(char::is_whitespace) {
                for (word, op) in WORD_OPS {
                    if let Some(after) = rest.strip_prefix(word) {
                        if after.starts_with(char::is_whitespace) {
                            return Some(WhereTokens {
                                field,
                                op,
                                value: after.trim(),
                            });
                        }
                    }
                }
            }
        }

        prev = Some(c);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_basic() {
        assert_eq!(
            split_stages("devices | where channels > 50 |sort by channels desc"),
            vec!["devices", "where channels > 50", "sort by channels desc"]
        );
        assert_eq!(split_stages("devices"), vec!["devices"]);
        assert_eq!(split_stages(""), vec![""]);
    }

    #[test]
    fn test_split_keeps_quoted_pipes() {
        assert_eq!(
            split_stages(r#"comms | where encryption == "AES|none" | count"#),
            vec!["comms", r#"where encryption == "AES|none""#, "count"]
        );
        assert_eq!(
            split_stages("comms | where note contains 'a|b' | count"),
            vec!["comms", "where note contains 'a|b'", "count"]
        );
    }

    #[test]
    fn test_split_apostrophe_in_word_is_text() {
        assert_eq!(
            split_stages("people | where name == O'Brien | take 1"),
            vec!["people", "where name == O'Brien", "take 1"]
        );
    }

    #[test]
    fn test_split_unterminated_quote_is_text() {
        assert_eq!(
            split_stages("t | where a == \"x | take 1"),
            vec!["t", "where a == \"x", "take 1"]
        );
        assert_eq!(
            split_stages("people | where name contains 's | count"),
            vec!["people", "where name contains 's", "count"]
        );
    }

    #[test]
    fn test_scan_unterminated_quote_is_text() {
        let t = scan_where("note == \"a>b").unwrap();
        assert_eq!(t.op, CompareOp::Eq);
        assert_eq!(t.value, "\"a>b");
    }

    #[test]
    fn test_scan_spaced_and_tight() {
        let spaced = scan_where("channels > 100").unwrap();
        let tight = scan_where("channels>100").unwrap();
        assert_eq!(spaced, tight);
        assert_eq!(spaced.field, "channels");
        assert_eq!(spaced.op, CompareOp::Gt);
        assert_eq!(spaced.value, "100");
    }

    #[test]
    fn test_scan_two_char_ops_win() {
        assert_eq!(scan_where("cvss>=9").unwrap().op, CompareOp::Ge);
        assert_eq!(scan_where("cvss <= 9").unwrap().op, CompareOp::Le);
        assert_eq!(scan_where("a != b").unwrap().op, CompareOp::Ne);
        assert_eq!(scan_where("a==b").unwrap().op, CompareOp::Eq);
    }

    #[test]
    fn test_scan_word_ops() {
        let t = scan_where("wireless_protocol contains \"bluetooth\"").unwrap();
        assert_eq!(t.op, CompareOp::Contains);
        assert_eq!(t.value, "\"bluetooth\"");
        assert_eq!(
            scan_where("encryption !contains None").unwrap().op,
            CompareOp::NotContains
        );
        assert_eq!(
            scan_where("name startswith Neu").unwrap().op,
            CompareOp::StartsWith
        );
        assert_eq!(scan_where("tags has funding").unwrap().op, CompareOp::Has);
    }

    #[test]
    fn test_scan_word_ops_need_boundaries() {
        // "has" inside a field name is not an operator
        let t = scan_where("has_fda == true").unwrap();
        assert_eq!(t.field, "has_fda");
        assert_eq!(t.op, CompareOp::Eq);
        assert!(scan_where("tags has").is_none());
    }

    #[test]
    fn test_scan_ignores_operators_inside_quotes() {
        let t = scan_where("title contains \"a>b\"").unwrap();
        assert_eq!(t.op, CompareOp::Contains);
        assert_eq!(t.value, "\"a>b\"");
    }

    #[test]
    fn test_scan_leftmost_operator_wins() {
        let t = scan_where("title contains a == b").unwrap();
        assert_eq!(t.op, CompareOp::Contains);
        assert_eq!(t.value, "a == b");
    }

    #[test]
    fn test_scan_rejects_missing_parts() {
        assert!(scan_where("channels 100").is_none());
        assert!(scan_where("== 5").is_none());
        assert!(scan_where("a = 5").is_none());
        assert!(scan_where("").is_none());
    }

    #[test]
    fn test_scan_empty_value_is_allowed() {
        let t = scan_where("companies !=").unwrap();
        assert_eq!(t.field, "companies");
        assert_eq!(t.value, "");
    }
}

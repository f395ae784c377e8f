//! `where field op value` predicates.

use std::fmt;

use serde::Serialize;

use crate::error::{KlqResult, Operand, QueryError};
use crate::lexer::scan_where;
use crate::value::{parse_literal, to_str, NumericCoercion, Row, Value};

/// Comparison operators accepted by `where`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompareOp {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "!contains")]
    NotContains,
    #[serde(rename = "startswith")]
    StartsWith,
    /// Same test as `contains`.
    #[serde(rename = "has")]
    Has,
}

impl CompareOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::Ge => ">=",
            CompareOp::Le => "<=",
            CompareOp::Contains => "contains",
            CompareOp::NotContains => "!contains",
            CompareOp::StartsWith => "startswith",
            CompareOp::Has => "has",
        }
    }

    /// Whether this operator compares numerically.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            CompareOp::Gt | CompareOp::Lt | CompareOp::Ge | CompareOp::Le
        )
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed `where` clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Predicate {
    pub field: String,
    pub op: CompareOp,
    pub value: Value,
}

impl Predicate {
    /// Parse the argument of a `where` stage.
    pub fn parse(clause: &str) -> KlqResult<Self> {
        let tokens = scan_where(clause)
            .ok_or_else(|| QueryError::InvalidWhereClause(clause.to_string()))?;
        Ok(Self {
            field: tokens.field.to_string(),
            op: tokens.op,
            value: parse_literal(tokens.value),
        })
    }

    /// Keep the rows that satisfy this predicate.
    pub fn filter(&self, rows: Vec<Row>, numeric: NumericCoercion) -> KlqResult<Vec<Row>> {
        let test = self.compile(numeric)?;
        let mut kept = Vec::with_capacity(rows.len());
        for row in rows {
            if test.matches(self, row.get(&self.field))? {
                kept.push(row);
            }
        }
        Ok(kept)
    }

    /// Evaluate against a single row.
    pub fn matches(&self, row: &Row, numeric: NumericCoercion) -> KlqResult<bool> {
        self.compile(numeric)?.matches(self, row.get(&self.field))
    }

    /// Precompute the literal side once per stage.
    fn compile(&self, numeric: NumericCoercion) -> KlqResult<Test> {
        if self.op.is_numeric() {
            let rhs = numeric
                .coerce(Some(&self.value))
                .ok_or_else(|| QueryError::NonNumericOperand {
                    field: self.field.clone(),
                    operand: Operand::Literal,
                    text: self.value.to_string(),
                })?;
            return Ok(Test::Numeric { rhs, numeric });
        }
        Ok(Test::Text {
            needle: self.value.to_string(),
            folded: self.value.to_string().to_lowercase(),
        })
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.field, self.op)?;
        fmt_literal(&self.value, f)
    }
}

/// Write a literal so that it parses back to the same value.
pub(crate) fn fmt_literal(value: &Value, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value {
        Value::String(s) if s.contains('"') => write!(f, "'{s}'"),
        Value::String(s) => write!(f, "\"{s}\""),
        other => write!(f, "{other}"),
    }
}

enum Test {
    Numeric { rhs: f64, numeric: NumericCoercion },
    Text { needle: String, folded: String },
}

impl Test {
    fn matches(&self, pred: &Predicate, rv: Option<&Value>) -> KlqResult<bool> {
        match self {
            Test::Numeric { rhs, numeric } => {
                let lhs = numeric
                    .coerce(rv)
                    .ok_or_else(|| QueryError::NonNumericOperand {
                        field: pred.field.clone(),
                        operand: Operand::Field,
                        text: to_str(rv),
                    })?;
                Ok(match pred.op {
                    CompareOp::Gt => lhs > *rhs,
                    CompareOp::Lt => lhs < *rhs,
                    CompareOp::Ge => lhs >= *rhs,
                    _ => lhs <= *rhs,
                })
            }
            Test::Text { needle, folded } => {
                let text = to_str(rv);
                let lower = text.to_lowercase();
                Ok(match pred.op {
                    CompareOp::Eq => text == *needle || rv == Some(&pred.value),
                    CompareOp::Ne => !(text == *needle || rv == Some(&pred.value)),
                    CompareOp::Contains | CompareOp::Has => lower.contains(folded.as_str()),
                    CompareOp::NotContains => !lower.contains(folded.as_str()),
                    _ => lower.starts_with(folded.as_str()),
                })
            }
        }
    }
}

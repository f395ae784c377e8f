//! Stage parser: classifies `|`-delimited segments by their leading keyword.
//!
//! Grammar:
//! ```text
//! query     := table ('|' stage)*
//! stage     := 'where ' field op value
//!            | 'sort by ' field ['asc' | 'desc']
//!            | ('take ' | 'limit ') integer
//!            | 'project ' field (',' field)*
//!            | 'summarize ' 'count()' 'by' field
//!            | 'distinct ' field
//!            | 'count'
//! op        := '==' | '!=' | '>' | '<' | '>=' | '<=' | 'contains' | '!contains' | 'startswith' | 'has'
//! ```

use std::fmt;

use serde::Serialize;

use crate::aggregate;
use crate::error::{KlqResult, QueryError};
use crate::lexer::split_stages;
use crate::predicate::Predicate;
use crate::transform::{self, SortOrder};
use crate::value::{NumericCoercion, Row};

/// One parsed pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum Stage {
    Where(Predicate),
    SortBy { field: String, order: SortOrder },
    Take { count: i64 },
    Project { fields: Vec<String> },
    /// `summarize count() by <by>`.
    Summarize { by: String },
    Distinct { field: String },
    Count,
}

impl Stage {
    /// Classify a trimmed segment. Prefixes are tested in a fixed order and
    /// are case-sensitive.
    pub fn parse(segment: &str) -> KlqResult<Self> {
        if let Some(arg) = segment.strip_prefix("where ") {
            return Predicate::parse(arg).map(Stage::Where);
        }
        if let Some(arg) = segment.strip_prefix("sort by ") {
            let (field, order) = transform::parse_sort(arg);
            return Ok(Stage::SortBy { field, order });
        }
        if segment.starts_with("take ") || segment.starts_with("limit ") {
            let count = transform::parse_take(segment)?;
            return Ok(Stage::Take { count });
        }
        if let Some(arg) = segment.strip_prefix("project ") {
            return Ok(Stage::Project {
                fields: transform::parse_project(arg),
            });
        }
        if let Some(arg) = segment.strip_prefix("summarize ") {
            let by = aggregate::parse_summarize(arg)?;
            return Ok(Stage::Summarize { by });
        }
        if let Some(arg) = segment.strip_prefix("distinct ") {
            return Ok(Stage::Distinct {
                field: arg.trim().to_string(),
            });
        }
        if segment == "count" {
            return Ok(Stage::Count);
        }
        Err(QueryError::UnknownOperation(segment.to_string()))
    }

    /// Keyword naming this stage, for logs.
    pub fn keyword(&self) -> &'static str {
        match self {
            Stage::Where(_) => "where",
            Stage::SortBy { .. } => "sort by",
            Stage::Take { .. } => "take",
            Stage::Project { .. } => "project",
            Stage::Summarize { .. } => "summarize",
            Stage::Distinct { .. } => "distinct",
            Stage::Count => "count",
        }
    }

    /// Apply this stage to a row-set, producing the next row-set.
    pub fn apply(&self, rows: Vec<Row>, numeric: NumericCoercion) -> KlqResult<Vec<Row>> {
        Ok(match self {
            Stage::Where(pred) => pred.filter(rows, numeric)?,
            Stage::SortBy { field, order } => transform::sort_rows(rows, field, *order),
            Stage::Take { count } => transform::take_rows(rows, *count),
            Stage::Project { fields } => transform::project_rows(rows, fields),
            Stage::Summarize { by } => aggregate::summarize_count(&rows, by),
            Stage::Distinct { field } => aggregate::distinct(&rows, field),
            Stage::Count => aggregate::count(&rows),
        })
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Where(pred) => write!(f, "where {pred}"),
            Stage::SortBy { field, order } => write!(f, "sort by {field} {order}"),
            Stage::Take { count } => write!(f, "take {count}"),
            Stage::Project { fields } => write!(f, "project {}", fields.join(", ")),
            Stage::Summarize { by } => write!(f, "summarize count() by {by}"),
            Stage::Distinct { field } => write!(f, "distinct {field}"),
            Stage::Count => f.write_str("count"),
        }
    }
}

/// A parsed query: a table reference plus ordered stages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pipeline {
    pub table: String,
    pub stages: Vec<Stage>,
}

impl Pipeline {
    /// Parse a query without resolving its table.
    ///
    /// Every stage is parsed; the first syntax error in stage order wins.
    pub fn parse(query: &str) -> KlqResult<Self> {
        let segments = split_stages(query.trim());
        let table = segments[0].to_string();
        let stages = parse_stages(&segments[1..])?;
        Ok(Self { table, stages })
    }
}

/// Parse the segments following the table name.
pub(crate) fn parse_stages(segments: &[&str]) -> KlqResult<Vec<Stage>> {
    segments.iter().map(|s| Stage::parse(s)).collect()
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.table)?;
        for stage in &self.stages {
            write!(f, " | {stage}")?;
        }
        Ok(())
    }
}

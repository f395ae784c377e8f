//! KLQ: a pipe-delimited, KQL-inspired query engine over schema-less in-memory tables.
//!
//! ```text
//! devices | where channels > 50 | sort by channels desc | take 10
//! ```
//!
//! A query names one table from a [`TableRegistry`], then threads its rows
//! through `where`, `sort by`, `take`/`limit`, `project`,
//! `summarize count() by`, `distinct` and `count` stages in order. The first
//! failing stage aborts the query; no partial rows are returned with an error.

pub mod aggregate;
pub mod error;
pub mod executor;
pub mod lexer;
pub mod predicate;
pub mod presets;
pub mod registry;
pub mod stage;
pub mod transform;
pub mod value;

pub use error::{ErrorKind, KlqResult, LoadError, Operand, QueryError};
pub use executor::{Engine, EngineConfig, QueryOutput, QueryResult};
pub use predicate::{CompareOp, Predicate};
pub use presets::{Preset, PRESETS};
pub use registry::{Table, TableRegistry, TableStats};
pub use stage::{Pipeline, Stage};
pub use transform::SortOrder;
pub use value::{NumericCoercion, Row, Value};

/// Run one query against `registry` with the default configuration.
pub fn run(registry: &TableRegistry, query: &str) -> QueryResult {
    Engine::new(registry.clone()).run(query)
}

//! Pipeline runner: resolves the table, then threads rows through each stage.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{KlqResult, QueryError};
use crate::lexer::split_stages;
use crate::registry::TableRegistry;
use crate::stage::{parse_stages, Stage};
use crate::value::{NumericCoercion, Row};

/// Engine settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// How `>`, `<`, `>=`, `<=` treat operands that are not numbers.
    #[serde(default)]
    pub numeric: NumericCoercion,
}

/// The rendering contract: rows or an error message, never both.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub rows: Vec<Row>,
    pub table_name: String,
    pub error: Option<String>,
}

impl QueryResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Successful output of [`Engine::execute`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOutput {
    pub table_name: String,
    pub rows: Vec<Row>,
}

/// Runs queries against a shared, read-only registry.
#[derive(Debug, Clone)]
pub struct Engine {
    registry: Arc<TableRegistry>,
    config: EngineConfig,
}

impl Engine {
    pub fn new(registry: impl Into<Arc<TableRegistry>>) -> Self {
        Self::with_config(registry, EngineConfig::default())
    }

    pub fn with_config(registry: impl Into<Arc<TableRegistry>>, config: EngineConfig) -> Self {
        Self {
            registry: registry.into(),
            config,
        }
    }

    pub fn registry(&self) -> &Arc<TableRegistry> {
        &self.registry
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    pub fn set_numeric(&mut self, numeric: NumericCoercion) {
        self.config.numeric = numeric;
    }

    /// Run a query and fold any failure into the result.
    pub fn run(&self, query: &str) -> QueryResult {
        match self.execute(query) {
            Ok(out) => QueryResult {
                rows: out.rows,
                table_name: out.table_name,
                error: None,
            },
            Err(e) => {
                tracing::debug!("Query failed: {e}");
                QueryResult {
                    rows: Vec::new(),
                    table_name: split_stages(query.trim())[0].to_string(),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Run a query, returning the first error.
    ///
    /// An empty query succeeds with no rows and an empty table name.
    pub fn execute(&self, query: &str) -> KlqResult<QueryOutput> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(QueryOutput::default());
        }

        let segments = split_stages(query);
        let table_name = segments[0];
        let table = self
            .registry
            .get(table_name)
            .ok_or_else(|| QueryError::UnknownTable {
                name: table_name.to_string(),
                available: self.registry.names(),
            })?;

        let stages = parse_stages(&segments[1..])?;
        let rows = self.apply(table.rows.clone(), &stages)?;

        Ok(QueryOutput {
            table_name: table_name.to_string(),
            rows,
        })
    }

    fn apply(&self, mut rows: Vec<Row>, stages: &[Stage]) -> KlqResult<Vec<Row>> {
        for stage in stages {
            let rows_in = rows.len();
            rows = stage.apply(rows, self.config.numeric)?;
            tracing::debug!(
                stage = stage.keyword(),
                rows_in,
                rows_out = rows.len(),
                "applied stage"
            );
        }
        Ok(rows)
    }
}

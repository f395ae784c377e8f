//! `klq_query` tool: run a pipe query and return its rows.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::session::QuerySession;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

#[derive(Debug, Deserialize)]
struct QueryParams {
    query: String,
    #[serde(default = "default_max_rows")]
    max_rows: usize,
}

fn default_max_rows() -> usize {
    200
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "klq_query".to_string(),
        description: Some(
            "Run a KLQ query such as `devices | where channels > 100 | sort by channels desc | take 10`"
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "table | stage | stage ..." },
                "max_rows": { "type": "integer", "default": 200, "description": "Cap on returned rows" }
            },
            "required": ["query"]
        }),
    }
}

pub async fn execute(
    args: Value,
    session: &Arc<Mutex<QuerySession>>,
) -> McpResult<ToolCallResult> {
    let params: QueryParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let session = session.lock().await;
    let mut output = match session.engine().execute(&params.query) {
        Ok(output) => output,
        Err(e) => {
            tracing::debug!("klq_query rejected '{}': {e}", params.query);
            return Ok(ToolCallResult::error(e.to_string()));
        }
    };

    let total = output.rows.len();
    output.rows.truncate(params.max_rows);

    Ok(ToolCallResult::json(&json!({
        "tableName": output.table_name,
        "total": total,
        "returned": output.rows.len(),
        "truncated": total > output.rows.len(),
        "rows": output.rows,
    })))
}

//! `klq_parse` tool: check a query's syntax without running it.

use serde::Deserialize;
use serde_json::{json, Value};

use klq::Pipeline;

use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

#[derive(Debug, Deserialize)]
struct ParseParams {
    query: String,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "klq_parse".to_string(),
        description: Some(
            "Parse a KLQ query and return its stages and normalized text, or the syntax error"
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "query": { "type": "string" }
            },
            "required": ["query"]
        }),
    }
}

pub async fn execute(args: Value) -> McpResult<ToolCallResult> {
    let params: ParseParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    match Pipeline::parse(&params.query) {
        Ok(pipeline) => Ok(ToolCallResult::json(&json!({
            "table": pipeline.table,
            "stages": pipeline.stages,
            "normalized": pipeline.to_string(),
        }))),
        Err(e) => Ok(ToolCallResult::error(e.to_string())),
    }
}

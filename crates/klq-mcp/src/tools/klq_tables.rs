//! `klq_tables` tool: list tables with row counts and field names.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde_json::{json, Value};

use crate::session::QuerySession;
use crate::types::{McpResult, ToolCallResult, ToolDefinition};

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "klq_tables".to_string(),
        description: Some("List queryable tables, their row counts and field names".to_string()),
        input_schema: json!({ "type": "object", "properties": {} }),
    }
}

pub async fn execute(
    _args: Value,
    session: &Arc<Mutex<QuerySession>>,
) -> McpResult<ToolCallResult> {
    let session = session.lock().await;
    Ok(ToolCallResult::json(&tables_summary(&session)))
}

/// Shared with the `klq://tables` resource.
pub fn tables_summary(session: &QuerySession) -> Value {
    let registry = session.registry();
    json!({
        "tables": registry.stats(),
        "table_count": registry.len(),
        "total_records": registry.total_rows(),
        "data_path": session.data_path().map(|p| p.display().to_string()),
        "loaded_secs_ago": session.age_secs(),
    })
}

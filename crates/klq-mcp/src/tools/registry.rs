//! Tool registration and dispatch.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde_json::Value;

use crate::session::QuerySession;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

use super::{klq_parse, klq_presets, klq_query, klq_tables};

pub struct ToolRegistry;

impl ToolRegistry {
    pub fn list_tools() -> Vec<ToolDefinition> {
        vec![
            klq_query::definition(),
            klq_tables::definition(),
            klq_presets::definition(),
            klq_parse::definition(),
        ]
    }

    pub async fn call(
        name: &str,
        arguments: Option<Value>,
        session: &Arc<Mutex<QuerySession>>,
    ) -> McpResult<ToolCallResult> {
        let args = arguments.unwrap_or(Value::Object(serde_json::Map::new()));

        match name {
            "klq_query" => klq_query::execute(args, session).await,
            "klq_tables" => klq_tables::execute(args, session).await,
            "klq_presets" => klq_presets::execute(args).await,
            "klq_parse" => klq_parse::execute(args).await,
            _ => Err(McpError::ToolNotFound(name.to_string())),
        }
    }
}

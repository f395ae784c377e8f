//! `klq_presets` tool: the catalog of example queries.

use serde::Deserialize;
use serde_json::{json, Value};

use klq::presets::{self, Preset, PRESETS};

use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

#[derive(Debug, Deserialize)]
struct PresetParams {
    #[serde(default)]
    group: Option<String>,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "klq_presets".to_string(),
        description: Some("List ready-made example queries, optionally for one group".to_string()),
        input_schema: json!({
            "type": "object",
            "properties": {
                "group": { "type": "string", "enum": presets::groups() }
            }
        }),
    }
}

pub async fn execute(args: Value) -> McpResult<ToolCallResult> {
    let params: PresetParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let selected: Vec<&Preset> = match params.group.as_deref() {
        Some(group) => presets::presets_in(group),
        None => PRESETS.iter().collect(),
    };
    if selected.is_empty() {
        return Ok(ToolCallResult::error(format!(
            "No presets in group \"{}\". Groups: {}",
            params.group.unwrap_or_default(),
            presets::groups().join(", ")
        )));
    }

    Ok(ToolCallResult::json(&json!({
        "count": selected.len(),
        "presets": selected,
    })))
}

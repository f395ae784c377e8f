//! `explore_table` prompt: survey one table's shape and values.

use serde_json::Value;

use crate::types::{McpResult, PromptGetResult, PromptMessage};

use super::registry::required_str;

pub fn expand(args: Value) -> McpResult<PromptGetResult> {
    let table = required_str(&args, "table")?;

    let text = format!(
        "Explore the KLQ table `{table}`.\n\n\
         Please:\n\
         1. Read klq://tables to see its row count and field names\n\
         2. Run `{table} | take 5` with klq_query to see sample rows\n\
         3. For categorical fields, run `{table} | summarize count() by <field>`\n\
         4. For numeric fields, try `{table} | sort by <field> desc | take 5`\n\
         5. Summarize what the table describes and which queries look most useful"
    );

    Ok(PromptGetResult {
        description: Some(format!("Survey the {table} table")),
        messages: vec![PromptMessage::user(text)],
    })
}

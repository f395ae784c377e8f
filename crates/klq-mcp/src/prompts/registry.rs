//! Prompt registration and dispatch.

use serde_json::Value;

use crate::types::{McpError, McpResult, PromptArgument, PromptDefinition, PromptGetResult};

use super::{answer_question, explore_table};

pub struct PromptRegistry;

impl PromptRegistry {
    pub fn list_prompts() -> Vec<PromptDefinition> {
        vec![
            PromptDefinition {
                name: "explore_table".to_string(),
                description: Some("Guide for getting to know one table".to_string()),
                arguments: Some(vec![PromptArgument {
                    name: "table".to_string(),
                    description: Some("Table to explore".to_string()),
                    required: true,
                }]),
            },
            PromptDefinition {
                name: "answer_question".to_string(),
                description: Some(
                    "Guide for answering a question with one or more KLQ queries".to_string(),
                ),
                arguments: Some(vec![PromptArgument {
                    name: "question".to_string(),
                    description: Some("The question to answer from the data".to_string()),
                    required: true,
                }]),
            },
        ]
    }

    pub async fn get(name: &str, arguments: Option<Value>) -> McpResult<PromptGetResult> {
        let args = arguments.unwrap_or(Value::Object(serde_json::Map::new()));

        match name {
            "explore_table" => explore_table::expand(args),
            "answer_question" => answer_question::expand(args),
            _ => Err(McpError::PromptNotFound(name.to_string())),
        }
    }
}

/// Read a required string argument.
pub(crate) fn required_str<'a>(args: &'a Value, name: &str) -> McpResult<&'a str> {
    args.get(name)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| McpError::InvalidParams(format!("'{name}' argument is required")))
}

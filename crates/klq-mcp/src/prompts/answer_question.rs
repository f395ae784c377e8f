//! `answer_question` prompt: turn a question into KLQ queries.

use serde_json::Value;

use crate::types::{McpResult, PromptGetResult, PromptMessage};

use super::registry::required_str;

pub fn expand(args: Value) -> McpResult<PromptGetResult> {
    let question = required_str(&args, "question")?;

    let text = format!(
        "Answer this question using the KLQ tables: {question}\n\n\
         Please:\n\
         1. Call klq_tables to find the tables and fields that relate to the question\n\
         2. Read klq://syntax if you are unsure of an operator\n\
         3. Check each query with klq_parse, then run it with klq_query\n\
         4. If a query returns an error, fix the query text and retry\n\
         5. Answer from the returned rows and show the queries you ran"
    );

    Ok(PromptGetResult {
        description: Some("Answer a question from the loaded tables".to_string()),
        messages: vec![PromptMessage::user(text)],
    })
}

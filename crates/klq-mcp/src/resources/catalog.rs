//! Resources: klq://presets and klq://syntax

use std::sync::Arc;
use tokio::sync::Mutex;

use serde_json::json;

use klq::presets::{self, PRESETS};

use crate::session::QuerySession;
use crate::types::{McpResult, ReadResourceResult, ResourceContent};

pub fn read_presets() -> McpResult<ReadResourceResult> {
    let content = json!({
        "groups": presets::groups(),
        "presets": &PRESETS[..],
    });
    Ok(ReadResourceResult {
        contents: vec![ResourceContent::json("klq://presets", &content)],
    })
}

pub async fn read_syntax(session: &Arc<Mutex<QuerySession>>) -> McpResult<ReadResourceResult> {
    let tables = session.lock().await.registry().names();
    Ok(ReadResourceResult {
        contents: vec![ResourceContent::plain("klq://syntax", syntax_reference(&tables))],
    })
}

/// Grammar and operator reference, listing the loaded tables.
pub fn syntax_reference(tables: &[String]) -> String {
    let tables = if tables.is_empty() {
        "(none loaded)".to_string()
    } else {
        tables.join(", ")
    };
    format!(
        "table | operator [args] | operator [args] | ...

TABLES:
  {tables}

OPERATORS:
  where field op value          Filter rows (op: ==, !=, >, <, >=, <=, contains, !contains, startswith, has)
  sort by field [asc|desc]      Sort results (stable; desc reverses)
  take N / limit N              Return first N rows
  project field1, field2        Keep only these fields, in this order
  summarize count() by field    Group and count, largest groups first
  distinct field                Unique values, first seen first
  count                         Total row count

EXAMPLES:
  devices | where channels > 100 | sort by channels desc
  techniques | where severity == \"critical\" | summarize count() by tactic
  companies | where security_posture == \"none_published\" | project name, type, funding_total_usd
  cves | sort by cvss desc | take 10

NOTES:
  Quote text values: \"invasive\", 'critical'. A | inside quotes does not split stages.
  Numbers are unquoted: 100, 1024
  contains, !contains, startswith and has ignore case
  Text compared with > or < counts as 0 unless strict mode is on"
    )
}

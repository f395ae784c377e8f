//! Resources: klq://tables and klq://table/{name}

use std::sync::Arc;
use tokio::sync::Mutex;

use serde_json::json;

use klq::QueryError;

use crate::session::QuerySession;
use crate::tools::klq_tables::tables_summary;
use crate::types::{McpResult, ReadResourceResult, ResourceContent};

pub async fn read_tables(session: &Arc<Mutex<QuerySession>>) -> McpResult<ReadResourceResult> {
    let session = session.lock().await;
    Ok(ReadResourceResult {
        contents: vec![ResourceContent::json("klq://tables", &tables_summary(&session))],
    })
}

pub async fn read_table(
    name: &str,
    session: &Arc<Mutex<QuerySession>>,
) -> McpResult<ReadResourceResult> {
    let session = session.lock().await;
    let registry = session.registry();
    let table = registry.get(name).ok_or_else(|| QueryError::UnknownTable {
        name: name.to_string(),
        available: registry.names(),
    })?;

    let content = json!({
        "name": table.name,
        "count": table.rows.len(),
        "fields": table.fields(),
        "rows": table.rows,
    });

    Ok(ReadResourceResult {
        contents: vec![ResourceContent::json(&format!("klq://table/{name}"), &content)],
    })
}

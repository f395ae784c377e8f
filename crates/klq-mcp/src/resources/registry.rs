//! Resource registration and dispatch.

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::session::QuerySession;
use crate::types::{
    McpError, McpResult, ReadResourceResult, ResourceDefinition, ResourceTemplateDefinition,
};

use super::{catalog, tables, templates};

pub struct ResourceRegistry;

impl ResourceRegistry {
    pub fn list_templates() -> Vec<ResourceTemplateDefinition> {
        templates::list_templates()
    }

    pub fn list_resources() -> Vec<ResourceDefinition> {
        templates::list_resources()
    }

    pub async fn read(
        uri: &str,
        session: &Arc<Mutex<QuerySession>>,
    ) -> McpResult<ReadResourceResult> {
        if let Some(name) = uri.strip_prefix("klq://table/") {
            if name.is_empty() {
                return Err(McpError::InvalidParams(
                    "Table URI must be klq://table/{name}".to_string(),
                ));
            }
            tables::read_table(name, session).await
        } else if uri == "klq://tables" {
            tables::read_tables(session).await
        } else if uri == "klq://presets" {
            catalog::read_presets()
        } else if uri == "klq://syntax" {
            catalog::read_syntax(session).await
        } else {
            Err(McpError::ResourceNotFound(uri.to_string()))
        }
    }
}

//! Resource URI templates and static resource definitions.

use crate::types::{ResourceDefinition, ResourceTemplateDefinition};

pub fn list_templates() -> Vec<ResourceTemplateDefinition> {
    vec![ResourceTemplateDefinition {
        uri_template: "klq://table/{name}".to_string(),
        name: "Table Rows".to_string(),
        description: Some("Every row of one table".to_string()),
        mime_type: Some("application/json".to_string()),
    }]
}

pub fn list_resources() -> Vec<ResourceDefinition> {
    vec![
        ResourceDefinition {
            uri: "klq://tables".to_string(),
            name: "Tables".to_string(),
            description: Some("Table names, row counts and field names".to_string()),
            mime_type: Some("application/json".to_string()),
        },
        ResourceDefinition {
            uri: "klq://presets".to_string(),
            name: "Preset Queries".to_string(),
            description: Some("Example queries grouped by subject".to_string()),
            mime_type: Some("application/json".to_string()),
        },
        ResourceDefinition {
            uri: "klq://syntax".to_string(),
            name: "Query Syntax".to_string(),
            description: Some("Operators, grammar and examples".to_string()),
            mime_type: Some("text/plain".to_string()),
        },
    ]
}

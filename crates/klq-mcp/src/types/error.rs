//! Server errors and their JSON-RPC codes.

use klq::{ErrorKind, LoadError, QueryError};

use super::message::{JsonRpcError, JsonRpcErrorObject, RequestId};

/// Standard JSON-RPC 2.0 error codes.
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// MCP and KLQ error codes.
pub mod mcp_error_codes {
    pub const RESOURCE_NOT_FOUND: i32 = -32802;
    pub const TOOL_NOT_FOUND: i32 = -32803;
    pub const PROMPT_NOT_FOUND: i32 = -32804;
    pub const QUERY_ERROR: i32 = -32850;
    pub const TABLE_NOT_FOUND: i32 = -32851;
    pub const DATA_LOAD_ERROR: i32 = -32852;
}

#[derive(thiserror::Error, Debug)]
pub enum McpError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Prompt not found: {0}")]
    PromptNotFound(String),

    /// Engine failure; the message is the engine's, verbatim.
    #[error("{0}")]
    Query(#[from] QueryError),

    #[error("Data load error: {0}")]
    DataLoad(#[from] LoadError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl McpError {
    pub fn code(&self) -> i32 {
        use error_codes::*;
        use mcp_error_codes::*;
        match self {
            McpError::ParseError(_) => PARSE_ERROR,
            McpError::InvalidRequest(_) => INVALID_REQUEST,
            McpError::MethodNotFound(_) => METHOD_NOT_FOUND,
            McpError::InvalidParams(_) => INVALID_PARAMS,
            McpError::InternalError(_) | McpError::Io(_) => INTERNAL_ERROR,
            McpError::ResourceNotFound(_) => RESOURCE_NOT_FOUND,
            McpError::ToolNotFound(_) => TOOL_NOT_FOUND,
            McpError::PromptNotFound(_) => PROMPT_NOT_FOUND,
            McpError::Query(e) if e.kind() == ErrorKind::UnknownTable => TABLE_NOT_FOUND,
            McpError::Query(_) => QUERY_ERROR,
            McpError::DataLoad(_) => DATA_LOAD_ERROR,
            McpError::Json(_) => PARSE_ERROR,
        }
    }

    pub fn to_json_rpc_error(&self, id: RequestId) -> JsonRpcError {
        let data = match self {
            McpError::Query(e) => Some(serde_json::json!({ "kind": e.kind() })),
            _ => None,
        };
        JsonRpcError::new(
            id,
            JsonRpcErrorObject {
                code: self.code(),
                message: self.to_string(),
                data,
            },
        )
    }
}

pub type McpResult<T> = Result<T, McpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_error_codes() {
        let unknown = McpError::from(QueryError::UnknownTable {
            name: "x".to_string(),
            available: vec![],
        });
        assert_eq!(unknown.code(), mcp_error_codes::TABLE_NOT_FOUND);

        let syntax = McpError::from(QueryError::UnknownOperation("bogus".to_string()));
        assert_eq!(syntax.code(), mcp_error_codes::QUERY_ERROR);
        assert_eq!(syntax.to_string(), "Unknown operation: \"bogus\"");

        let err = syntax.to_json_rpc_error(RequestId::Number(7));
        assert_eq!(
            err.error.data,
            Some(serde_json::json!({ "kind": "UnknownOperation" }))
        );
    }
}

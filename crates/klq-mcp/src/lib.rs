//! KLQ MCP server: pipe queries over JSON tables for LLM clients, plus a CLI and REPL.

pub mod config;
pub mod prompts;
pub mod protocol;
pub mod render;
pub mod repl;
pub mod resources;
pub mod session;
pub mod tools;
pub mod transport;
pub mod types;

pub use config::{resolve_coercion, resolve_data_path};
pub use protocol::ProtocolHandler;
pub use session::QuerySession;
pub use transport::StdioTransport;

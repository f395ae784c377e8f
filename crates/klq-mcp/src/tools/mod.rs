//! MCP tool implementations.

pub mod klq_parse;
pub mod klq_presets;
pub mod klq_query;
pub mod klq_tables;
pub mod registry;

pub use registry::ToolRegistry;

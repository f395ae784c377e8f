//! MCP resource implementations.

pub mod catalog;
pub mod registry;
pub mod tables;
pub mod templates;

pub use registry::ResourceRegistry;

//! MCP prompt implementations.

pub mod answer_question;
pub mod explore_table;
pub mod registry;

pub use registry::PromptRegistry;

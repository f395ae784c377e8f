//! Query session: the loaded tables and the engine over them.

pub mod manager;

pub use manager::QuerySession;

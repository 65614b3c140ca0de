pub mod error;
pub mod mcp;

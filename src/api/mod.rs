pub mod mcp;
pub mod rest;
pub mod sse;

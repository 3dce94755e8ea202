pub mod insights;
pub mod mcp;

//! MCP (Model Context Protocol) client wiring
//!
//! Registers the workspace's MCP servers with the agent so it can reach the
//! Apollo gateway and the spreadsheet server. The servers themselves are
//! external sub-projects; only their client-side registration lives here.

pub mod config;

pub use config::{ensure_agent_mcp_json, ensure_agent_settings, McpConfig, McpServerConfig};

//! Port trait definitions (Hexagonal Architecture)
//!
//! - `ToolSession`: one live connection to an external MCP tool server
//! - `SessionFactory`: turns a server descriptor into a live session
//!
//! These traits let the registry, the typed service clients and the HTTP
//! handlers run against the stdio implementation in production and against
//! scripted sessions in tests.

pub mod mcp_client;

pub use mcp_client::{McpError, SessionFactory, SessionState, ToolSession};

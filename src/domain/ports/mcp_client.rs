use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::domain::models::mcp_server::ServerDescriptor;
use crate::domain::models::tool::ToolInfo;

/// Error types specific to MCP sessions
#[derive(Debug, Clone, thiserror::Error)]
pub enum McpError {
    #[error("failed to spawn MCP server '{server}': {reason}")]
    SpawnFailed { server: String, reason: String },

    #[error("transport error for MCP server '{server}': {reason}")]
    Transport { server: String, reason: String },

    #[error("MCP server error [{code}]: {message}")]
    JsonRpc { code: i64, message: String },

    #[error("empty MCP tools/call result")]
    EmptyResult,

    #[error("MCP session '{0}' is not initialized")]
    NotInitialized(String),

    #[error("MCP session '{0}' is closed")]
    Closed(String),

    #[error("HTTP MCP transport not yet supported (server '{0}')")]
    UnsupportedTransport(String),
}

/// Lifecycle of a tool session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Initialized,
    Closed,
}

/// Port trait for one live MCP tool session
///
/// Every operation is a request/response exchange with the tool server.
/// Implementations serialize exchanges per session, so a session can be
/// shared across concurrent HTTP requests behind an `Arc`.
#[async_trait]
pub trait ToolSession: Send + Sync {
    /// Name of the server this session talks to (used in logs and errors).
    fn server_name(&self) -> &str;

    /// Perform the handshake. Calling it on an initialized session is a no-op.
    async fn initialize(&self, client_name: &str, client_version: &str) -> Result<(), McpError>;

    /// Liveness round trip.
    async fn ping(&self) -> Result<(), McpError>;

    /// List the tools the server exposes.
    async fn list_tools(&self) -> Result<Vec<ToolInfo>, McpError>;

    /// Invoke a tool and return the text of the first content item
    ///
    /// # Errors
    /// - `McpError::EmptyResult` - the server returned no content
    /// - any transport-class variant when the exchange itself fails
    async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> Result<String, McpError>;

    /// Close the session. Safe to call more than once.
    async fn close(&self) -> Result<(), McpError>;
}

/// Port trait for creating sessions from configuration
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Launch the server described by `descriptor` and wrap it in a session.
    async fn connect(&self, descriptor: &ServerDescriptor) -> Result<Arc<dyn ToolSession>, McpError>;
}

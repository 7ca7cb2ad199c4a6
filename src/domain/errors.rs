//! Domain errors for the photo gateway.

use thiserror::Error;

use super::ports::mcp_client::McpError;

/// Maximum number of characters of a raw tool payload kept in a decode error.
const RAW_SNIPPET_CHARS: usize = 200;

/// Errors surfaced by the typed service clients and the HTTP layer.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The tool session failed (spawn, I/O, JSON-RPC error, empty result).
    #[error(transparent)]
    Mcp(#[from] McpError),

    /// The tool answered, but its payload did not match the expected shape.
    #[error("failed to parse {context}: {reason}; raw response: {snippet}")]
    Decode {
        context: &'static str,
        reason: String,
        snippet: String,
    },

    /// The upstream API reported a failure through its own status field.
    #[error("{api} API error: status={status}{}", status_message(.message))]
    DomainStatus {
        api: &'static str,
        status: i64,
        message: Option<String>,
    },

    /// A request parameter was missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// No MCP server was configured for the requested capability.
    #[error("{0} MCP client not configured")]
    ClientUnavailable(&'static str),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl GatewayError {
    /// Build a decode error that carries a truncated copy of the raw payload.
    pub fn decode(context: &'static str, raw: &str, err: &serde_json::Error) -> Self {
        Self::Decode {
            context,
            reason: err.to_string(),
            snippet: truncate_snippet(raw),
        }
    }

    /// Whether the error was caused by the caller rather than an upstream.
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

fn status_message(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(" message={m}"))
        .unwrap_or_default()
}

/// Truncate a raw payload on a character boundary for diagnostics.
fn truncate_snippet(raw: &str) -> String {
    match raw.char_indices().nth(RAW_SNIPPET_CHARS) {
        Some((cut, _)) => format!("{}...", &raw[..cut]),
        None => raw.to_string(),
    }
}

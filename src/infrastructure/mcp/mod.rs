//! MCP (Model Context Protocol) infrastructure module
//!
//! Provides the client side of MCP:
//! - `StdioTransport` - newline-delimited JSON-RPC over byte streams
//! - `StdioToolSession` - a session backed by a spawned child process
//! - `ClientRegistry` - sessions for every active server in `mcp.json`
//! - `MockToolSession` - scripted sessions for testing
//!
//! Only stdio servers are supported. Entries that only declare a `baseUrl`
//! fail registry construction.

pub mod client;
pub mod mock_client;
pub mod registry;
pub mod transport;
pub mod types;

pub use client::{StdioSessionFactory, StdioToolSession};
pub use mock_client::{MockSessionFactory, MockToolSession, RecordedCall};
pub use registry::ClientRegistry;
pub use transport::StdioTransport;

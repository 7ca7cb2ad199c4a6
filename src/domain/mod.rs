//! Domain layer for the photo gateway
//!
//! This module contains the gateway's models, the port traits that
//! infrastructure adapters implement, and the error taxonomy shared by the
//! service and HTTP layers.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{GatewayError, GatewayResult};
pub use ports::mcp_client::McpError;

//! Infrastructure layer module
//!
//! This module contains the adapters to the outside world:
//! - MCP stdio sessions and the client registry
//! - Configuration management
//! - Logging infrastructure
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod logging;
pub mod mcp;

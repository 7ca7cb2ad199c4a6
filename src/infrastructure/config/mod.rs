//! Configuration management infrastructure
//!
//! Hierarchical application configuration using figment:
//! - YAML file loading
//! - Environment variable overrides
//! - Configuration validation
//!
//! plus the JSON document that declares the MCP servers.

pub mod loader;

pub use loader::{ConfigError, ConfigLoader, McpConfigLoader};

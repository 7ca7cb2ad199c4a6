//! Photo Gateway - HTTP gateway over MCP tool servers
//!
//! Exposes content-search and mapping endpoints whose data comes from
//! external MCP servers spoken to over stdio JSON-RPC.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, errors and the `ToolSession` port
//! - **Infrastructure Layer** (`infrastructure`): config, logging, the stdio
//!   MCP client and the client registry
//! - **Service Layer** (`services`): typed facades and output parsing
//! - **Adapters** (`adapters`): the axum HTTP surface
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use photo_gateway::infrastructure::mcp::{ClientRegistry, StdioSessionFactory};
//!
//! let registry = ClientRegistry::build(&document.descriptors(), &StdioSessionFactory).await?;
//! let xhs = registry.find_first(&["xhs", "xiaohongshu"]);
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{GatewayError, GatewayResult};
pub use domain::models::{ClientInfo, Config, McpServersConfig, ServerDescriptor, XhsPost};
pub use domain::ports::{McpError, SessionFactory, ToolSession};
pub use infrastructure::config::{ConfigError, ConfigLoader, McpConfigLoader};
pub use infrastructure::mcp::{ClientRegistry, StdioSessionFactory};
pub use services::{BaiduMapsService, MapsService, XhsService};

//! CLI command implementations.

pub mod maps;
pub mod mcp;
pub mod serve;
pub mod xhs;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use crate::domain::models::{ClientInfo, Config};
use crate::domain::ports::ToolSession;
use crate::infrastructure::config::{ConfigLoader, McpConfigLoader};
use crate::infrastructure::mcp::{ClientRegistry, StdioSessionFactory};

/// Load the application config, from `path` when given.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

pub fn client_info(config: &Config) -> ClientInfo {
    ClientInfo::new(&config.mcp.client_name, &config.mcp.client_version)
}

/// Start every active server in the MCP document.
pub async fn build_registry(config: &Config) -> Result<ClientRegistry> {
    let document = McpConfigLoader::load_configured(config.mcp.config_path.as_deref())?;
    ClientRegistry::build(&document.descriptors(), &StdioSessionFactory)
        .await
        .context("Failed to start MCP servers")
}

/// Build the registry and pick the first session matching `candidates`.
///
/// The registry is closed again when nothing matches.
pub async fn connect_first(
    config: &Config,
    candidates: &[String],
    label: &str,
) -> Result<(ClientRegistry, Arc<dyn ToolSession>)> {
    let mut registry = build_registry(config).await?;
    match registry.find_first(candidates) {
        Some(session) => Ok((registry, session)),
        None => {
            registry.close_all().await;
            anyhow::bail!("No {label} MCP server configured (looked for {})", candidates.join(", "))
        }
    }
}

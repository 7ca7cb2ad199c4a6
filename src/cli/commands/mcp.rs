//! `mcp probe`: check that a configured server starts and answers

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::warn;

use super::client_info;
use crate::cli::output::{create_spinner_with_message, output, CommandOutput, ProgressBarExt, TableFormatter};
use crate::domain::models::{ClientInfo, Config, ServerDescriptor, ToolInfo};
use crate::domain::ports::{SessionFactory, ToolSession};
use crate::infrastructure::config::McpConfigLoader;
use crate::infrastructure::logging::SecretScrubber;
use crate::infrastructure::mcp::StdioSessionFactory;

#[derive(Debug, Serialize)]
pub struct ProbeReport {
    pub server: String,
    pub command: String,
    pub env: std::collections::BTreeMap<String, String>,
    pub tools: Vec<ToolInfo>,
    #[serde(skip)]
    descriptor: ServerDescriptor,
}

impl CommandOutput for ProbeReport {
    fn to_human(&self) -> String {
        let formatter = TableFormatter::new();
        format!(
            "{}\n{} tool(s)\n{}",
            formatter.format_server(&self.descriptor),
            self.tools.len(),
            formatter.format_tools(&self.tools)
        )
    }
}

pub async fn probe(config: &Config, server: &str, json: bool) -> Result<()> {
    let document = McpConfigLoader::load_configured(config.mcp.config_path.as_deref())?;
    let descriptor = document
        .descriptor(server)
        .with_context(|| format!("MCP server '{server}' not found in configuration"))?;
    if !descriptor.is_active {
        anyhow::bail!("MCP server '{server}' is not active");
    }

    let spinner = create_spinner_with_message(format!("Starting {server}"));
    let session = match StdioSessionFactory.connect(&descriptor).await {
        Ok(session) => session,
        Err(e) => {
            spinner.finish_error(format!("{server} failed to start"));
            return Err(e).context("Failed to start MCP server");
        }
    };

    let result = handshake(session.as_ref(), &client_info(config)).await;
    if let Err(e) = session.close().await {
        warn!(server_name = server, error = %e, "failed to close MCP session");
    }

    let tools = match result {
        Ok(tools) => {
            spinner.finish_success(format!("{server} is responding"));
            tools
        }
        Err(e) => {
            spinner.finish_error(format!("{server} did not respond"));
            return Err(e);
        }
    };

    let report = ProbeReport {
        server: descriptor.key.clone(),
        command: SecretScrubber::scrub_message(&descriptor.command),
        env: SecretScrubber::scrub_env(&descriptor.env),
        tools,
        descriptor,
    };
    output(&report, json);
    Ok(())
}

async fn handshake(session: &dyn ToolSession, client: &ClientInfo) -> Result<Vec<ToolInfo>> {
    session
        .initialize(&client.name, &client.version)
        .await
        .context("initialize failed")?;
    session.ping().await.context("ping failed")?;
    session.list_tools().await.context("tools/list failed")
}

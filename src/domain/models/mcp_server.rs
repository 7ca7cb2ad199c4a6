use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Top-level MCP servers document (`mcp.json`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct McpServersConfig {
    #[serde(rename = "mcpServers", default)]
    pub mcp_servers: BTreeMap<String, McpServerEntry>,
}

/// One entry of the `mcpServers` map, exactly as written in the document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpServerEntry {
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub env: HashMap<String, String>,
}

/// How a descriptor asks to be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Spawn `command` and speak JSON-RPC over its stdio.
    Stdio,
    /// Only a base URL is given; no HTTP transport exists.
    Http,
    /// Neither a command nor a base URL.
    Unreachable,
}

/// A configured MCP server, keyed by its entry in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerDescriptor {
    pub key: String,
    pub name: String,
    pub command: String,
    pub args: Vec<String>,
    pub env: HashMap<String, String>,
    pub base_url: Option<String>,
    pub is_active: bool,
}

impl ServerDescriptor {
    pub fn from_entry(key: &str, entry: &McpServerEntry) -> Self {
        let base_url = Some(entry.base_url.trim())
            .filter(|url| !url.is_empty())
            .map(str::to_string);
        Self {
            key: key.to_string(),
            name: entry.name.clone(),
            command: entry.command.clone(),
            args: entry.args.clone(),
            env: entry.env.clone(),
            base_url,
            is_active: entry.is_active,
        }
    }

    pub fn transport(&self) -> TransportKind {
        if !self.command.trim().is_empty() {
            TransportKind::Stdio
        } else if self.base_url.is_some() {
            TransportKind::Http
        } else {
            TransportKind::Unreachable
        }
    }

    /// Lowercased, trimmed display name; `None` when no name is declared.
    pub fn name_key(&self) -> Option<String> {
        let name = self.name.trim().to_lowercase();
        (!name.is_empty()).then_some(name)
    }
}

impl McpServersConfig {
    /// All descriptors in ascending key order.
    pub fn descriptors(&self) -> Vec<ServerDescriptor> {
        self.mcp_servers
            .iter()
            .map(|(key, entry)| ServerDescriptor::from_entry(key, entry))
            .collect()
    }

    pub fn descriptor(&self, key: &str) -> Option<ServerDescriptor> {
        self.mcp_servers
            .get(key)
            .map(|entry| ServerDescriptor::from_entry(key, entry))
    }
}

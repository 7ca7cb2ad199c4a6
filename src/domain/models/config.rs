use serde::{Deserialize, Serialize};

/// Main configuration structure for the gateway
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// HTTP listener configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// MCP session settings
    #[serde(default)]
    pub mcp: McpSettings,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Attach a permissive CORS layer to the router
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8080
}

const fn default_enable_cors() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            enable_cors: default_enable_cors(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling JSON log files; stderr only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,

    /// File rotation: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

/// MCP session settings
///
/// The `*_servers` lists are lookup keys tried in order against the client
/// registry; the first hit wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct McpSettings {
    /// Path to the `mcpServers` JSON document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,

    /// Name announced in `initialize`
    #[serde(default = "default_client_name")]
    pub client_name: String,

    /// Version announced in `initialize`
    #[serde(default = "default_client_version")]
    pub client_version: String,

    #[serde(default = "default_xhs_servers")]
    pub xhs_servers: Vec<String>,

    #[serde(default = "default_maps_servers")]
    pub maps_servers: Vec<String>,

    #[serde(default = "default_baidu_maps_servers")]
    pub baidu_maps_servers: Vec<String>,

    /// Run a best-effort `login` when the content session is first readied
    #[serde(default = "default_login_on_first_use")]
    pub login_on_first_use: bool,
}

fn default_client_name() -> String {
    "photo-backend-server".to_string()
}

fn default_client_version() -> String {
    "1.0.0".to_string()
}

fn default_xhs_servers() -> Vec<String> {
    vec!["xhs".to_string(), "xiaohongshu".to_string()]
}

fn default_maps_servers() -> Vec<String> {
    vec!["maps".to_string()]
}

fn default_baidu_maps_servers() -> Vec<String> {
    vec!["baidu-maps".to_string(), "baidu".to_string()]
}

const fn default_login_on_first_use() -> bool {
    true
}

impl Default for McpSettings {
    fn default() -> Self {
        Self {
            config_path: None,
            client_name: default_client_name(),
            client_version: default_client_version(),
            xhs_servers: default_xhs_servers(),
            maps_servers: default_maps_servers(),
            baidu_maps_servers: default_baidu_maps_servers(),
            login_on_first_use: default_login_on_first_use(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.mcp.client_name, "photo-backend-server");
        assert_eq!(config.mcp.xhs_servers, vec!["xhs", "xiaohongshu"]);
        assert!(config.mcp.config_path.is_none());
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"server": {"port": 9090}}"#).unwrap();
        assert_eq!(config.server.port, 9090);
        assert!(config.server.enable_cors);
        assert_eq!(config.mcp.maps_servers, vec!["maps"]);
    }
}

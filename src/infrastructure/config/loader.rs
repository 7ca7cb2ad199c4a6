use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::models::config::Config;
use crate::domain::models::mcp_server::McpServersConfig;

/// Default application config file, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "photo-gateway.yaml";

/// Optional local overrides merged on top of the main file.
pub const LOCAL_CONFIG_FILE: &str = "photo-gateway.local.yaml";

/// MCP document picked up when no path is configured.
pub const DEFAULT_MCP_CONFIG_FILE: &str = "mcp.json";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port: {0}. Must be between 1 and 65535")]
    InvalidPort(u16),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    #[error("MCP client name cannot be empty")]
    EmptyClientName,

    #[error("MCP client version cannot be empty")]
    EmptyClientVersion,

    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read MCP config {path}: {source}")]
    McpDocumentRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse MCP config {path}: {source}")]
    McpDocumentParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. photo-gateway.yaml
    /// 3. photo-gateway.local.yaml (optional overrides)
    /// 4. Environment variables (PHOTO_GATEWAY_* prefix, `__` for nesting)
    /// 5. Legacy `PORT` and `MCP_CONFIG_PATH`
    pub fn load() -> Result<Config> {
        let config: Config = Self::figment(Path::new(DEFAULT_CONFIG_FILE))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration with `path` standing in for photo-gateway.yaml
    ///
    /// Unlike the default file, an explicit file must exist.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()).into());
        }

        let config: Config = Self::figment(path)
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment(config_file: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(config_file))
            .merge(Yaml::file(LOCAL_CONFIG_FILE))
            .merge(Env::prefixed("PHOTO_GATEWAY_").split("__"))
            .merge(Env::raw().only(&["PORT"]).map(|_| "server.port".into()))
            .merge(
                Env::raw()
                    .only(&["MCP_CONFIG_PATH"])
                    .map(|_| "mcp.config_path".into()),
            )
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.server.port == 0 {
            return Err(ConfigError::InvalidPort(config.server.port));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        if config.mcp.client_name.trim().is_empty() {
            return Err(ConfigError::EmptyClientName);
        }
        if config.mcp.client_version.trim().is_empty() {
            return Err(ConfigError::EmptyClientVersion);
        }

        Ok(())
    }
}

/// Loader for the `mcpServers` JSON document
pub struct McpConfigLoader;

impl McpConfigLoader {
    /// Pick the document to load: the configured path, else `./mcp.json` when present.
    pub fn resolve_path(configured: Option<&str>) -> Option<PathBuf> {
        Self::resolve_path_in(configured, Path::new("."))
    }

    fn resolve_path_in(configured: Option<&str>, dir: &Path) -> Option<PathBuf> {
        if let Some(path) = configured.map(str::trim).filter(|p| !p.is_empty()) {
            return Some(PathBuf::from(path));
        }
        let fallback = dir.join(DEFAULT_MCP_CONFIG_FILE);
        fallback.exists().then_some(fallback)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<McpServersConfig, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::McpDocumentRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::McpDocumentParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve and load; an absent document yields an empty server set.
    pub fn load_configured(configured: Option<&str>) -> Result<McpServersConfig, ConfigError> {
        match Self::resolve_path(configured) {
            Some(path) => Self::load(path),
            None => Ok(McpServersConfig::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn yaml_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_default_config_is_valid() {
        ConfigLoader::validate(&Config::default()).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
server:
  port: 9000
  enable_cors: false
logging:
  level: debug
  format: json
mcp:
  client_name: photo-cli
  xhs_servers: [rednote]
";
        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.server.port, 9000);
        assert!(!config.server.enable_cors);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.mcp.client_name, "photo-cli");
        assert_eq!(config.mcp.client_version, "1.0.0");
        assert_eq!(config.mcp.xhs_servers, vec!["rednote"]);
        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidPort(0))
        ));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }

    #[test]
    fn test_validate_invalid_rotation() {
        let mut config = Config::default();
        config.logging.rotation = "weekly".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidRotation(_))
        ));
    }

    #[test]
    fn test_validate_empty_client_name() {
        let mut config = Config::default();
        config.mcp.client_name = "  ".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyClientName)
        ));
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let result = ConfigLoader::load_from_file("/nonexistent/photo-gateway.yaml");
        assert!(result.is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        let file = yaml_file("server:\n  port: 9000\nlogging:\n  level: warn\n");
        temp_env::with_vars(
            [
                ("PHOTO_GATEWAY_LOGGING__LEVEL", Some("debug")),
                ("PORT", None::<&str>),
                ("MCP_CONFIG_PATH", None),
            ],
            || {
                let config = ConfigLoader::load_from_file(file.path()).unwrap();
                assert_eq!(config.server.port, 9000, "file value should persist");
                assert_eq!(config.logging.level, "debug", "env should win");
            },
        );
    }

    #[test]
    fn test_legacy_env_vars() {
        let file = yaml_file("server:\n  port: 9000\n");
        temp_env::with_vars(
            [
                ("PORT", Some("7070")),
                ("MCP_CONFIG_PATH", Some("/etc/photo/mcp.json")),
            ],
            || {
                let config = ConfigLoader::load_from_file(file.path()).unwrap();
                assert_eq!(config.server.port, 7070);
                assert_eq!(config.mcp.config_path.as_deref(), Some("/etc/photo/mcp.json"));
            },
        );
    }

    #[test]
    fn test_resolve_path_prefers_configured() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_MCP_CONFIG_FILE), "{}").unwrap();
        let resolved = McpConfigLoader::resolve_path_in(Some("/custom/mcp.json"), dir.path());
        assert_eq!(resolved, Some(PathBuf::from("/custom/mcp.json")));
    }

    #[test]
    fn test_resolve_path_falls_back_to_local_document() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(McpConfigLoader::resolve_path_in(None, dir.path()), None);

        std::fs::write(dir.path().join(DEFAULT_MCP_CONFIG_FILE), "{}").unwrap();
        assert_eq!(
            McpConfigLoader::resolve_path_in(Some(" "), dir.path()),
            Some(dir.path().join(DEFAULT_MCP_CONFIG_FILE))
        );
    }

    #[test]
    fn test_load_mcp_document() {
        let file = yaml_file(
            r#"{"mcpServers": {"maps": {"command": "maps-mcp", "isActive": true}}}"#,
        );
        let config = McpConfigLoader::load(file.path()).unwrap();
        let maps = config.descriptor("maps").unwrap();
        assert_eq!(maps.command, "maps-mcp");
        assert!(maps.is_active);
    }

    #[test]
    fn test_load_malformed_mcp_document() {
        let file = yaml_file("{\"mcpServers\": [}");
        assert!(matches!(
            McpConfigLoader::load(file.path()),
            Err(ConfigError::McpDocumentParse { .. })
        ));
    }
}

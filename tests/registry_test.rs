//! Registry construction from an `mcpServers` document

use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use photo_gateway::domain::models::{McpServersConfig, McpSettings, ServerDescriptor};
use photo_gateway::domain::ports::{McpError, SessionFactory, ToolSession};
use photo_gateway::infrastructure::config::McpConfigLoader;
use photo_gateway::infrastructure::mcp::{ClientRegistry, MockSessionFactory, MockToolSession};
use proptest::prelude::*;
use tempfile::NamedTempFile;

const DOCUMENT: &str = r#"{
    "mcpServers": {
        "xiaohongshu-mcp": {
            "command": "npx",
            "args": ["-y", "xiaohongshu-mcp"],
            "name": "XHS",
            "isActive": true
        },
        "maps": {
            "command": "node",
            "args": ["maps-server.js"],
            "isActive": true
        },
        "baidu-map": {
            "command": "npx",
            "args": ["-y", "@baidumap/mcp-server-baidu-map"],
            "env": {"BAIDU_MAP_API_KEY": "secret"},
            "name": "Baidu",
            "isActive": true
        },
        "retired": {
            "command": "old-server",
            "isActive": false
        }
    }
}"#;

fn write_document(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_default_candidates_resolve_against_document() {
    let file = write_document(DOCUMENT);
    let document = McpConfigLoader::load(file.path()).unwrap();
    let factory = MockSessionFactory::new();

    let mut registry = ClientRegistry::build(&document.descriptors(), &factory).await.unwrap();
    assert_eq!(factory.connect_count(), 3);

    let settings = McpSettings::default();
    let xhs = registry.find_first(&settings.xhs_servers).unwrap();
    assert_eq!(xhs.server_name(), "xiaohongshu-mcp");

    let maps = registry.find_first(&settings.maps_servers).unwrap();
    assert_eq!(maps.server_name(), "maps");

    let baidu = registry.find_first(&settings.baidu_maps_servers).unwrap();
    assert_eq!(baidu.server_name(), "baidu-map");

    assert!(registry.find_by_key_or_name("retired").is_none());

    registry.close_all().await;
    for key in ["xiaohongshu-mcp", "maps", "baidu-map"] {
        assert_eq!(factory.session(key).unwrap().close_count(), 1, "{key}");
    }
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_factory_failure_closes_earlier_sessions() {
    let file = write_document(DOCUMENT);
    let document = McpConfigLoader::load(file.path()).unwrap();

    // "baidu-map" sorts first and connects; "maps" then fails to spawn.
    struct FailOn<'a> {
        inner: &'a MockSessionFactory,
        key: &'static str,
    }

    #[async_trait]
    impl SessionFactory for FailOn<'_> {
        async fn connect(&self, descriptor: &ServerDescriptor) -> Result<Arc<dyn ToolSession>, McpError> {
            if descriptor.key == self.key {
                return Err(McpError::SpawnFailed {
                    server: descriptor.key.clone(),
                    reason: "No such file or directory".to_string(),
                });
            }
            self.inner.connect(descriptor).await
        }
    }

    let inner = MockSessionFactory::new();
    let factory = FailOn { inner: &inner, key: "maps" };
    let err = ClientRegistry::build(&document.descriptors(), &factory)
        .await
        .err()
        .unwrap();

    assert!(matches!(err, McpError::SpawnFailed { ref server, .. } if server == "maps"));
    assert!(inner.session("baidu-map").unwrap().is_closed());
}

#[tokio::test]
async fn test_shared_session_is_closed_once() {
    let shared = Arc::new(MockToolSession::new("shared"));
    let factory = MockSessionFactory::new().with_session("xhs", shared.clone());
    let document = McpConfigLoader::load(
        write_document(r#"{"mcpServers": {"xhs": {"command": "x", "name": "Xiaohongshu", "isActive": true}}}"#)
            .path(),
    )
    .unwrap();

    let mut registry = ClientRegistry::build(&document.descriptors(), &factory).await.unwrap();
    assert_eq!(registry.keys(), vec!["xhs", "xiaohongshu"]);

    registry.close_all().await;
    assert_eq!(shared.close_count(), 1);
}

#[cfg(unix)]
#[tokio::test]
async fn test_stdio_factory_spawns_and_close_all_terminates() {
    use photo_gateway::infrastructure::mcp::StdioSessionFactory;

    let document = McpConfigLoader::load(
        write_document(r#"{"mcpServers": {"echo": {"command": "cat", "isActive": true}}}"#).path(),
    )
    .unwrap();

    let mut registry = ClientRegistry::build(&document.descriptors(), &StdioSessionFactory)
        .await
        .unwrap();
    let session = registry.find_by_key_or_name("ECHO").unwrap();

    registry.close_all().await;
    assert!(matches!(session.ping().await, Err(McpError::Closed(_))));
}

#[cfg(unix)]
#[tokio::test]
async fn test_non_utf8_stderr_does_not_kill_the_server() {
    use std::collections::HashMap;

    use photo_gateway::domain::ports::SessionState;
    use photo_gateway::infrastructure::mcp::StdioToolSession;

    const SCRIPT: &str = r#"
printf 'boot \377\376 log\n' >&2
read -r line
printf '%s\n' '{"jsonrpc":"2.0","id":1,"result":{"protocolVersion":"2024-11-05","capabilities":{},"serverInfo":{"name":"sh","version":"0"}}}'
read -r line
printf 'still \377 alive\n' >&2
read -r line
printf '%s\n' '{"jsonrpc":"2.0","id":2,"result":{}}'
cat > /dev/null
"#;

    let descriptor = ServerDescriptor {
        key: "noisy".to_string(),
        name: String::new(),
        command: "sh".to_string(),
        args: vec!["-c".to_string(), SCRIPT.to_string()],
        env: HashMap::new(),
        base_url: None,
        is_active: true,
    };

    let session = StdioToolSession::spawn(&descriptor).unwrap();
    session.initialize("photo-backend-server", "1.0.0").await.unwrap();
    assert_eq!(session.state().await, SessionState::Initialized);

    // The child wrote to stderr again before answering.
    session.ping().await.unwrap();
    session.close().await.unwrap();
}

fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,11}"
}

proptest! {
    #[test]
    fn registered_keys_are_found_exactly_and_case_insensitively(
        keys in proptest::collection::btree_set(key_strategy(), 1..6)
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        runtime.block_on(async {
            let servers: serde_json::Map<String, serde_json::Value> = keys
                .iter()
                .map(|key| (key.clone(), serde_json::json!({"command": "x", "isActive": true})))
                .collect();
            let document: McpServersConfig =
                serde_json::from_value(serde_json::json!({ "mcpServers": servers })).unwrap();

            let factory = MockSessionFactory::new();
            let registry = ClientRegistry::build(&document.descriptors(), &factory).await.unwrap();

            for key in &keys {
                let exact = registry.find_by_key_or_name(key).unwrap();
                prop_assert_eq!(exact.server_name(), key.as_str());

                let upper = registry.find_by_key_or_name(&key.to_uppercase()).unwrap();
                prop_assert_eq!(upper.server_name(), key.as_str());
            }
            prop_assert!(registry.find_by_key_or_name("#not-a-key#").is_none());
            Ok::<(), TestCaseError>(())
        })?;
    }
}

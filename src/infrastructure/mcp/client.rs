//! Stdio MCP session
//!
//! Spawns a tool server as a child process and speaks MCP over its
//! stdin/stdout. All exchanges of one session are serialized behind a
//! single async mutex, so one session can back concurrent HTTP requests.

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStderr, Command};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::transport::StdioTransport;
use super::types::PROTOCOL_VERSION;
use crate::domain::models::mcp_server::{ServerDescriptor, TransportKind};
use crate::domain::models::tool::{ToolContent, ToolInfo};
use crate::domain::ports::mcp_client::{McpError, SessionFactory, SessionState, ToolSession};
use crate::infrastructure::logging::SecretScrubber;

/// Time a child gets to exit after SIGTERM before it is killed.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

struct SessionInner {
    state: SessionState,
    transport: Option<StdioTransport>,
    child: Option<Child>,
}

/// A live MCP session over a child process's stdio
pub struct StdioToolSession {
    server_name: String,
    inner: Mutex<SessionInner>,
}

impl StdioToolSession {
    /// Spawn the server described by `descriptor`
    ///
    /// The child's stderr is forwarded to `tracing` at debug level.
    /// Must be called from within a tokio runtime.
    pub fn spawn(descriptor: &ServerDescriptor) -> Result<Self, McpError> {
        let server_name = descriptor.key.clone();
        let spawn_error = |reason: String| McpError::SpawnFailed {
            server: server_name.clone(),
            reason,
        };

        info!(
            server_name = %server_name,
            command = %descriptor.command,
            args = %SecretScrubber::scrub_message(&descriptor.args.join(" ")),
            "spawning MCP server"
        );

        let mut child = Command::new(&descriptor.command)
            .args(&descriptor.args)
            .envs(&descriptor.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| spawn_error(e.to_string()))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| spawn_error("child stdin not captured".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| spawn_error("child stdout not captured".to_string()))?;
        if let Some(stderr) = child.stderr.take() {
            forward_stderr(server_name.clone(), stderr);
        }

        let transport = StdioTransport::new(&server_name, Box::new(stdin), Box::new(stdout));
        Ok(Self::with_parts(server_name, transport, Some(child)))
    }

    /// Wrap an already-connected transport with no child process.
    pub fn from_transport(server_name: impl Into<String>, transport: StdioTransport) -> Self {
        Self::with_parts(server_name.into(), transport, None)
    }

    fn with_parts(server_name: String, transport: StdioTransport, child: Option<Child>) -> Self {
        Self {
            server_name,
            inner: Mutex::new(SessionInner {
                state: SessionState::Uninitialized,
                transport: Some(transport),
                child,
            }),
        }
    }

    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.state
    }

    /// Run one request on an initialized session.
    async fn exchange(&self, method: &str, params: Value) -> Result<Value, McpError> {
        let mut inner = self.inner.lock().await;
        match inner.state {
            SessionState::Uninitialized => {
                return Err(McpError::NotInitialized(self.server_name.clone()));
            }
            SessionState::Closed => return Err(McpError::Closed(self.server_name.clone())),
            SessionState::Initialized => {}
        }
        let transport = inner
            .transport
            .as_mut()
            .ok_or_else(|| McpError::Closed(self.server_name.clone()))?;
        transport.request(method, Some(params)).await
    }
}

#[async_trait]
impl ToolSession for StdioToolSession {
    fn server_name(&self) -> &str {
        &self.server_name
    }

    #[instrument(skip(self), fields(server_name = %self.server_name))]
    async fn initialize(&self, client_name: &str, client_version: &str) -> Result<(), McpError> {
        let mut inner = self.inner.lock().await;
        match inner.state {
            SessionState::Initialized => return Ok(()),
            SessionState::Closed => return Err(McpError::Closed(self.server_name.clone())),
            SessionState::Uninitialized => {}
        }
        let transport = inner
            .transport
            .as_mut()
            .ok_or_else(|| McpError::Closed(self.server_name.clone()))?;

        let result = transport
            .request(
                "initialize",
                Some(json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": {},
                    "clientInfo": {"name": client_name, "version": client_version},
                })),
            )
            .await?;
        transport.notify("notifications/initialized", None).await?;
        inner.state = SessionState::Initialized;

        let server_info = result.get("serverInfo").cloned().unwrap_or_default();
        let protocol_version = result
            .get("protocolVersion")
            .and_then(Value::as_str)
            .unwrap_or_default();
        info!(%server_info, protocol_version, "MCP session initialized");
        Ok(())
    }

    async fn ping(&self) -> Result<(), McpError> {
        self.exchange("ping", json!({})).await.map(|_| ())
    }

    async fn list_tools(&self) -> Result<Vec<ToolInfo>, McpError> {
        let result = self.exchange("tools/list", json!({})).await?;
        let tools = result.get("tools").cloned().unwrap_or_else(|| json!([]));
        serde_json::from_value(tools).map_err(|e| McpError::Transport {
            server: self.server_name.clone(),
            reason: format!("invalid tools/list result: {e}"),
        })
    }

    #[instrument(skip(self, arguments), fields(server_name = %self.server_name))]
    async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> Result<String, McpError> {
        let mut result = self
            .exchange("tools/call", json!({"name": name, "arguments": arguments}))
            .await?;

        let is_error = result.get("isError").and_then(Value::as_bool).unwrap_or(false);
        let first = match result.get_mut("content").map(Value::take) {
            Some(Value::Array(items)) => items.into_iter().next(),
            _ => None,
        };
        let text = first
            .map(ToolContent::from_value)
            .map(ToolContent::into_text)
            .ok_or(McpError::EmptyResult)?;

        if is_error {
            warn!(tool_name = name, text = %text, "tool reported an error result");
        }
        Ok(text)
    }

    async fn close(&self) -> Result<(), McpError> {
        let (transport, child) = {
            let mut inner = self.inner.lock().await;
            if inner.state == SessionState::Closed {
                return Ok(());
            }
            inner.state = SessionState::Closed;
            (inner.transport.take(), inner.child.take())
        };

        if let Some(mut transport) = transport {
            transport.close_writer().await;
        }
        if let Some(child) = child {
            terminate(&self.server_name, child).await;
        }
        info!(server_name = %self.server_name, "MCP session closed");
        Ok(())
    }
}

/// Keep draining the child's stderr until EOF.
///
/// Lines are read as raw bytes; a non-UTF-8 line must not end the task,
/// since dropping the pipe would kill the child with SIGPIPE on its next write.
fn forward_stderr(server_name: String, stderr: ChildStderr) {
    tokio::spawn(async move {
        let mut reader = BufReader::new(stderr);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    debug!(
                        server_name = %server_name,
                        line = %SecretScrubber::scrub_message(line.trim_end()),
                        "MCP server stderr"
                    );
                }
                Err(e) => {
                    debug!(server_name = %server_name, error = %e, "stopped reading MCP server stderr");
                    break;
                }
            }
        }
    });
}

/// Ask the child to exit, then force it after the grace period.
async fn terminate(server_name: &str, mut child: Child) {
    send_sigterm(server_name, &mut child);

    match tokio::time::timeout(SHUTDOWN_GRACE, child.wait()).await {
        Ok(Ok(status)) => debug!(server_name, %status, "MCP server exited"),
        Ok(Err(e)) => warn!(server_name, error = %e, "error waiting for MCP server to exit"),
        Err(_) => {
            warn!(server_name, "MCP server shutdown timeout, forcing kill");
            if let Err(e) = child.kill().await {
                warn!(server_name, error = %e, "failed to kill MCP server");
            }
        }
    }
}

#[cfg(unix)]
fn send_sigterm(server_name: &str, child: &mut Child) {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    let Some(pid) = child.id().and_then(|id| i32::try_from(id).ok()) else {
        return;
    };
    if let Err(e) = kill(Pid::from_raw(pid), Signal::SIGTERM) {
        debug!(server_name, error = %e, "SIGTERM failed");
    }
}

#[cfg(not(unix))]
fn send_sigterm(server_name: &str, child: &mut Child) {
    if let Err(e) = child.start_kill() {
        debug!(server_name, error = %e, "failed to signal MCP server");
    }
}

/// Creates stdio sessions for command-based descriptors
#[derive(Debug, Clone, Copy, Default)]
pub struct StdioSessionFactory;

#[async_trait]
impl SessionFactory for StdioSessionFactory {
    async fn connect(&self, descriptor: &ServerDescriptor) -> Result<Arc<dyn ToolSession>, McpError> {
        match descriptor.transport() {
            TransportKind::Stdio => Ok(Arc::new(StdioToolSession::spawn(descriptor)?)),
            TransportKind::Http => Err(McpError::UnsupportedTransport(descriptor.key.clone())),
            TransportKind::Unreachable => Err(McpError::SpawnFailed {
                server: descriptor.key.clone(),
                reason: "no command configured".to_string(),
            }),
        }
    }
}

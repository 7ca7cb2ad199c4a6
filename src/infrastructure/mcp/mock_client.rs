//! Mock MCP sessions for testing

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::models::mcp_server::ServerDescriptor;
use crate::domain::models::tool::ToolInfo;
use crate::domain::ports::mcp_client::{McpError, SessionFactory, SessionState, ToolSession};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A recorded `tools/call` invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub tool: String,
    pub arguments: Map<String, Value>,
}

/// Scripted in-memory tool session
///
/// Follows the same state rules as a real session: calls before
/// `initialize` fail with `NotInitialized`, calls after `close` fail with
/// `Closed`. Tools without a scripted response answer with a JSON-RPC
/// "unknown tool" error.
pub struct MockToolSession {
    server_name: String,
    state: Mutex<SessionState>,
    responses: Mutex<HashMap<String, Result<String, McpError>>>,
    initialize_failures: Mutex<Vec<McpError>>,
    tools: Mutex<Vec<ToolInfo>>,
    calls: Mutex<Vec<RecordedCall>>,
    initialize_count: AtomicUsize,
    close_count: AtomicUsize,
}

impl MockToolSession {
    pub fn new(server_name: impl Into<String>) -> Self {
        Self {
            server_name: server_name.into(),
            state: Mutex::new(SessionState::Uninitialized),
            responses: Mutex::new(HashMap::new()),
            initialize_failures: Mutex::new(Vec::new()),
            tools: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            initialize_count: AtomicUsize::new(0),
            close_count: AtomicUsize::new(0),
        }
    }

    /// Script the text returned by `tool`.
    pub fn respond(&self, tool: &str, text: impl Into<String>) -> &Self {
        lock(&self.responses).insert(tool.to_string(), Ok(text.into()));
        self
    }

    /// Script an error for `tool`.
    pub fn fail(&self, tool: &str, error: McpError) -> &Self {
        lock(&self.responses).insert(tool.to_string(), Err(error));
        self
    }

    /// Make the next `initialize` call fail with `error`. Stacks.
    pub fn fail_next_initialize(&self, error: McpError) -> &Self {
        lock(&self.initialize_failures).push(error);
        self
    }

    pub fn set_tools(&self, tools: Vec<ToolInfo>) -> &Self {
        *lock(&self.tools) = tools;
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    pub fn calls_to(&self, tool: &str) -> Vec<RecordedCall> {
        lock(&self.calls)
            .iter()
            .filter(|call| call.tool == tool)
            .cloned()
            .collect()
    }

    /// Number of `initialize` calls that reached the server, successful or not.
    pub fn initialize_count(&self) -> usize {
        self.initialize_count.load(Ordering::SeqCst)
    }

    pub fn close_count(&self) -> usize {
        self.close_count.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        *lock(&self.state) == SessionState::Closed
    }

    fn require_ready(&self) -> Result<(), McpError> {
        match *lock(&self.state) {
            SessionState::Initialized => Ok(()),
            SessionState::Uninitialized => Err(McpError::NotInitialized(self.server_name.clone())),
            SessionState::Closed => Err(McpError::Closed(self.server_name.clone())),
        }
    }
}

#[async_trait]
impl ToolSession for MockToolSession {
    fn server_name(&self) -> &str {
        &self.server_name
    }

    async fn initialize(&self, _client_name: &str, _client_version: &str) -> Result<(), McpError> {
        let mut state = lock(&self.state);
        match *state {
            SessionState::Initialized => return Ok(()),
            SessionState::Closed => return Err(McpError::Closed(self.server_name.clone())),
            SessionState::Uninitialized => {}
        }
        self.initialize_count.fetch_add(1, Ordering::SeqCst);
        let mut failures = lock(&self.initialize_failures);
        if !failures.is_empty() {
            return Err(failures.remove(0));
        }
        *state = SessionState::Initialized;
        Ok(())
    }

    async fn ping(&self) -> Result<(), McpError> {
        self.require_ready()
    }

    async fn list_tools(&self) -> Result<Vec<ToolInfo>, McpError> {
        self.require_ready()?;
        Ok(lock(&self.tools).clone())
    }

    async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> Result<String, McpError> {
        self.require_ready()?;
        lock(&self.calls).push(RecordedCall {
            tool: name.to_string(),
            arguments,
        });
        lock(&self.responses)
            .get(name)
            .cloned()
            .unwrap_or_else(|| {
                Err(McpError::JsonRpc {
                    code: -32601,
                    message: format!("unknown tool: {name}"),
                })
            })
    }

    async fn close(&self) -> Result<(), McpError> {
        let mut state = lock(&self.state);
        if *state != SessionState::Closed {
            *state = SessionState::Closed;
            self.close_count.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

/// Factory that hands out mock sessions, pre-registered or fresh
#[derive(Default)]
pub struct MockSessionFactory {
    prepared: Mutex<HashMap<String, Arc<MockToolSession>>>,
    created: Mutex<BTreeMap<String, Arc<MockToolSession>>>,
    connect_count: AtomicUsize,
}

impl MockSessionFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `session` when the descriptor with key `key` is connected.
    pub fn with_session(self, key: &str, session: Arc<MockToolSession>) -> Self {
        lock(&self.prepared).insert(key.to_string(), session);
        self
    }

    /// The session handed out for `key`, if any.
    pub fn session(&self, key: &str) -> Option<Arc<MockToolSession>> {
        lock(&self.created).get(key).cloned()
    }

    pub fn connect_count(&self) -> usize {
        self.connect_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionFactory for MockSessionFactory {
    async fn connect(&self, descriptor: &ServerDescriptor) -> Result<Arc<dyn ToolSession>, McpError> {
        self.connect_count.fetch_add(1, Ordering::SeqCst);
        let session = lock(&self.prepared)
            .remove(&descriptor.key)
            .unwrap_or_else(|| Arc::new(MockToolSession::new(descriptor.key.clone())));
        lock(&self.created).insert(descriptor.key.clone(), Arc::clone(&session));
        Ok(session)
    }
}

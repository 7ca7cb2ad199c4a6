//! Common test utilities for integration tests
//!
//! Provides an in-memory MCP server that speaks newline-delimited JSON-RPC
//! over `tokio::io::duplex`, plus helpers for driving the HTTP router.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::task::JoinHandle;
use tower::ServiceExt;

use photo_gateway::infrastructure::mcp::{StdioToolSession, StdioTransport};

/// How the fake server answers one tool
#[derive(Debug, Clone)]
pub enum ToolReply {
    Text(String),
    /// A result flagged with `isError: true`.
    ToolError(String),
    /// A JSON-RPC error object.
    RpcError { code: i64, message: String },
    /// A result whose `content` array is empty.
    Empty,
    /// Close the connection without answering.
    HangUp,
}

/// Scripted behaviour of the fake server
#[derive(Debug, Clone, Default)]
pub struct Script {
    tools: HashMap<String, ToolReply>,
    noisy: bool,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, tool: &str, text: &str) -> Self {
        self.tools.insert(tool.to_string(), ToolReply::Text(text.to_string()));
        self
    }

    pub fn reply(mut self, tool: &str, reply: ToolReply) -> Self {
        self.tools.insert(tool.to_string(), reply);
        self
    }

    /// Emit a log line and a notification before every response.
    pub fn noisy(mut self) -> Self {
        self.noisy = true;
        self
    }
}

/// Handle on a running fake server
pub struct FakeServer {
    received: Arc<Mutex<Vec<Value>>>,
    handle: JoinHandle<()>,
}

impl FakeServer {
    /// Start a fake server and a session connected to it.
    pub fn start(server_name: &str, script: Script) -> (StdioToolSession, FakeServer) {
        let (client_end, server_end) = tokio::io::duplex(64 * 1024);
        let (client_read, client_write) = tokio::io::split(client_end);
        let transport = StdioTransport::new(server_name, Box::new(client_write), Box::new(client_read));
        let session = StdioToolSession::from_transport(server_name, transport);

        let received = Arc::new(Mutex::new(Vec::new()));
        let handle = tokio::spawn(serve(server_end, script, Arc::clone(&received)));
        (session, FakeServer { received, handle })
    }

    /// Every message the server has read, in order.
    pub fn received(&self) -> Vec<Value> {
        self.received.lock().expect("lock").clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.received()
            .iter()
            .filter_map(|m| m.get("method").and_then(Value::as_str).map(str::to_string))
            .collect()
    }

    /// Wait for the server to see EOF on its input, then return what it read.
    pub async fn finished(self) -> Vec<Value> {
        self.handle.await.expect("fake server panicked");
        let received = self.received.lock().expect("lock");
        received.clone()
    }
}

async fn serve(stream: tokio::io::DuplexStream, script: Script, received: Arc<Mutex<Vec<Value>>>) {
    let (read, mut write) = tokio::io::split(stream);
    let mut lines = BufReader::new(read).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        let Ok(message) = serde_json::from_str::<Value>(&line) else {
            continue;
        };
        received.lock().expect("lock").push(message.clone());

        let Some(id) = message.get("id").cloned() else {
            continue;
        };
        let method = message.get("method").and_then(Value::as_str).unwrap_or_default();

        let outcome = match method {
            "initialize" => Ok(json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {"tools": {}},
                "serverInfo": {"name": "fake-mcp", "version": "0.0.1"},
            })),
            "ping" => Ok(json!({})),
            "tools/list" => {
                let mut names: Vec<&String> = script.tools.keys().collect();
                names.sort();
                let tools: Vec<Value> = names
                    .into_iter()
                    .map(|name| json!({"name": name, "description": format!("fake {name}"), "inputSchema": {"type": "object"}}))
                    .collect();
                Ok(json!({ "tools": tools }))
            }
            "tools/call" => {
                let tool = message["params"]["name"].as_str().unwrap_or_default();
                match script.tools.get(tool) {
                    Some(ToolReply::Text(text)) => Ok(json!({"content": [{"type": "text", "text": text}]})),
                    Some(ToolReply::ToolError(text)) => {
                        Ok(json!({"content": [{"type": "text", "text": text}], "isError": true}))
                    }
                    Some(ToolReply::RpcError { code, message }) => Err(json!({"code": code, "message": message})),
                    Some(ToolReply::Empty) => Ok(json!({"content": []})),
                    Some(ToolReply::HangUp) => return,
                    None => Err(json!({"code": -32601, "message": format!("unknown tool: {tool}")})),
                }
            }
            other => Err(json!({"code": -32601, "message": format!("method not found: {other}")})),
        };

        if script.noisy {
            let noise = "[fake-mcp] handling request\n{\"jsonrpc\":\"2.0\",\"method\":\"notifications/message\",\"params\":{}}\n";
            if write.write_all(noise.as_bytes()).await.is_err() {
                return;
            }
        }

        let response = match outcome {
            Ok(result) => json!({"jsonrpc": "2.0", "id": id, "result": result}),
            Err(error) => json!({"jsonrpc": "2.0", "id": id, "error": error}),
        };
        let mut out = response.to_string();
        out.push('\n');
        if write.write_all(out.as_bytes()).await.is_err() {
            return;
        }
    }
}

/// Send a GET through the router and decode the JSON body.
pub async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("router is infallible");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}

//! Newline-delimited JSON-RPC over a pair of byte streams.
//!
//! The streams are normally a child process's stdin/stdout, but any
//! `AsyncRead`/`AsyncWrite` pair works, which lets tests drive a session
//! through `tokio::io::duplex`.

use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, trace};

use super::types::{JsonRpcNotification, JsonRpcRequest, JsonRpcResponse};
use crate::domain::ports::mcp_client::McpError;
use crate::infrastructure::logging::SecretScrubber;

pub type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;
pub type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;

/// Bi-directional JSON-RPC transport. Not shareable; callers serialize access.
pub struct StdioTransport {
    server_name: String,
    writer: Option<BoxedWriter>,
    reader: BufReader<BoxedReader>,
    next_id: u64,
}

impl StdioTransport {
    pub fn new(server_name: &str, writer: BoxedWriter, reader: BoxedReader) -> Self {
        Self {
            server_name: server_name.to_string(),
            writer: Some(writer),
            reader: BufReader::new(reader),
            next_id: 1,
        }
    }

    /// Allocate the next request id. Ids increase monotonically per transport.
    pub fn next_request_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Send a request and read lines until the matching response arrives
    ///
    /// Lines that are not the awaited response (server logs, notifications,
    /// stale responses) are skipped.
    ///
    /// # Errors
    /// - `McpError::Transport` on I/O failure or when the server closes stdout
    /// - `McpError::JsonRpc` when the server answers with an error object
    pub async fn request(&mut self, method: &str, params: Option<Value>) -> Result<Value, McpError> {
        let id = self.next_request_id();
        self.write_line(&JsonRpcRequest::new(id, method, params)).await?;

        let mut buf = Vec::new();
        loop {
            buf.clear();
            let bytes_read = self
                .reader
                .read_until(b'\n', &mut buf)
                .await
                .map_err(|e| self.transport_error(format!("failed to read from stdout: {e}")))?;

            if bytes_read == 0 {
                return Err(self.transport_error("server stdout closed (process may have exited)"));
            }

            // Noise lines may not be valid UTF-8.
            let line = String::from_utf8_lossy(&buf);
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match serde_json::from_str::<JsonRpcResponse>(trimmed) {
                Ok(response) if response.answers(id) => {
                    debug!(server_name = %self.server_name, method, id, "received response");
                    return extract_result(response);
                }
                _ => {
                    trace!(
                        server_name = %self.server_name,
                        line = %SecretScrubber::scrub_message(trimmed),
                        "skipping unrelated line"
                    );
                }
            }
        }
    }

    /// Send a notification; no response is read.
    pub async fn notify(&mut self, method: &str, params: Option<Value>) -> Result<(), McpError> {
        self.write_line(&JsonRpcNotification {
            jsonrpc: "2.0",
            method,
            params,
        })
        .await
    }

    /// Shut down the write half so the peer observes EOF.
    pub async fn close_writer(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            if let Err(e) = writer.shutdown().await {
                debug!(server_name = %self.server_name, error = %e, "error shutting down stdin");
            }
        }
    }

    async fn write_line<T: Serialize>(&mut self, message: &T) -> Result<(), McpError> {
        let mut json = serde_json::to_string(message)
            .map_err(|e| self.transport_error(format!("failed to serialize message: {e}")))?;
        debug!(
            server_name = %self.server_name,
            message = %SecretScrubber::scrub_message(&json),
            "sending JSON-RPC message"
        );
        json.push('\n');

        let Some(writer) = self.writer.as_mut() else {
            return Err(self.transport_error("stdin already closed"));
        };
        let written = async {
            writer.write_all(json.as_bytes()).await?;
            writer.flush().await
        }
        .await;
        written.map_err(|e| self.transport_error(format!("failed to write to stdin: {e}")))
    }

    fn transport_error(&self, reason: impl Into<String>) -> McpError {
        McpError::Transport {
            server: self.server_name.clone(),
            reason: reason.into(),
        }
    }
}

/// Extract the result from a JSON-RPC response, converting errors to `McpError`.
fn extract_result(response: JsonRpcResponse) -> Result<Value, McpError> {
    if let Some(err) = response.error {
        return Err(McpError::JsonRpc {
            code: err.code,
            message: err.message,
        });
    }
    Ok(response.result.unwrap_or(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, duplex};

    fn transport_pair() -> (StdioTransport, tokio::io::DuplexStream, tokio::io::DuplexStream) {
        let (client_out, server_in) = duplex(4096);
        let (server_out, client_in) = duplex(4096);
        let transport = StdioTransport::new("test", Box::new(client_out), Box::new(client_in));
        (transport, server_in, server_out)
    }

    #[test]
    fn test_next_request_id_is_monotonic() {
        let (mut transport, _, _) = transport_pair();
        let id1 = transport.next_request_id();
        let id2 = transport.next_request_id();
        assert!(id2 > id1);
    }

    #[tokio::test]
    async fn test_request_skips_noise_until_matching_id() {
        let (mut transport, mut server_in, mut server_out) = transport_pair();
        server_out
            .write_all(
                b"starting server...\n\
                  {\"jsonrpc\":\"2.0\",\"method\":\"notifications/message\"}\n\
                  {\"jsonrpc\":\"2.0\",\"id\":99,\"result\":{}}\n\
                  {\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{\"ok\":true}}\n",
            )
            .await
            .unwrap();

        let result = transport.request("ping", Some(json!({}))).await.unwrap();
        assert_eq!(result, json!({"ok": true}));

        let mut buf = vec![0u8; 256];
        let n = server_in.read(&mut buf).await.unwrap();
        let sent: Value = serde_json::from_slice(buf[..n].trim_ascii_end()).unwrap();
        assert_eq!(sent["method"], "ping");
        assert_eq!(sent["id"], 1);
    }

    #[tokio::test]
    async fn test_request_skips_non_utf8_noise() {
        let (mut transport, _server_in, mut server_out) = transport_pair();
        server_out
            .write_all(b"boot \xff\xfe log\n{\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{}}\n")
            .await
            .unwrap();

        let result = transport.request("ping", None).await.unwrap();
        assert_eq!(result, json!({}));
    }

    #[tokio::test]
    async fn test_error_response_maps_to_json_rpc_error() {
        let (mut transport, _server_in, mut server_out) = transport_pair();
        server_out
            .write_all(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"error\":{\"code\":-32601,\"message\":\"Method not found\"}}\n")
            .await
            .unwrap();

        let err = transport.request("bogus", None).await.unwrap_err();
        assert!(matches!(err, McpError::JsonRpc { code: -32601, .. }));
    }

    #[tokio::test]
    async fn test_eof_is_transport_error() {
        let (mut transport, _server_in, server_out) = transport_pair();
        drop(server_out);

        let err = transport.request("ping", None).await.unwrap_err();
        assert!(matches!(err, McpError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_write_after_close_fails() {
        let (mut transport, _server_in, _server_out) = transport_pair();
        transport.close_writer().await;
        let err = transport.notify("notifications/initialized", None).await.unwrap_err();
        assert!(err.to_string().contains("stdin already closed"));
    }
}

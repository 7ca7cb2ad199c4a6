//! Content-search client over an MCP session

use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::post_parser::{normalize_post_url, note_id, parse_search_output};
use super::tool_calls::ToolCall;
use crate::domain::errors::GatewayResult;
use crate::domain::models::post::XhsPost;
use crate::domain::ports::mcp_client::{McpError, ToolSession};

/// Keyword used when hot posts are requested.
pub const HOT_KEYWORD: &str = "热门";

/// Typed facade over the content platform's tool server
#[derive(Clone)]
pub struct XhsService {
    session: Arc<dyn ToolSession>,
}

impl XhsService {
    pub fn new(session: Arc<dyn ToolSession>) -> Self {
        Self { session }
    }

    pub async fn initialize(&self, client_name: &str, client_version: &str) -> Result<(), McpError> {
        self.session.initialize(client_name, client_version).await
    }

    /// Hot posts are a keyword search for [`HOT_KEYWORD`].
    pub async fn get_hot_posts(&self, limit: u32) -> GatewayResult<Vec<XhsPost>> {
        self.get_posts_by_keyword(HOT_KEYWORD, limit).await
    }

    /// Search posts and normalize their URLs
    ///
    /// Posts whose URL normalizes to nothing are dropped; the rest are
    /// de-duplicated on the normalized URL and get their note id filled in.
    #[instrument(skip(self), fields(server_name = self.session.server_name()))]
    pub async fn get_posts_by_keyword(&self, keyword: &str, limit: u32) -> GatewayResult<Vec<XhsPost>> {
        let raw = self
            .call(&ToolCall::SearchNotes {
                keywords: keyword.to_string(),
                limit,
            })
            .await?;

        let posts = canonicalize(parse_search_output(&raw));
        debug!(count = posts.len(), "parsed search_notes output");
        Ok(posts)
    }

    /// Best-effort login; the tool decides whether a session already exists.
    pub async fn login(&self) -> GatewayResult<String> {
        self.call(&ToolCall::Login).await
    }

    pub async fn get_note_content(&self, url: &str) -> GatewayResult<String> {
        self.call(&ToolCall::GetNoteContent {
            url: url.to_string(),
        })
        .await
    }

    /// Validate and run a typed tool call.
    pub async fn call(&self, call: &ToolCall) -> GatewayResult<String> {
        call.validate()?;
        Ok(self.session.call_tool(call.name(), call.arguments()).await?)
    }

    /// Run any tool with caller-built arguments.
    pub async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> GatewayResult<String> {
        Ok(self.session.call_tool(name, arguments).await?)
    }

    pub async fn close(&self) -> Result<(), McpError> {
        self.session.close().await
    }
}

fn canonicalize(posts: Vec<XhsPost>) -> Vec<XhsPost> {
    let mut seen = HashSet::new();
    posts
        .into_iter()
        .filter_map(|mut post| {
            post.post_url = normalize_post_url(&post.post_url);
            if post.post_url.is_empty() || !seen.insert(post.post_url.clone()) {
                return None;
            }
            if post.id.is_empty() {
                if let Some(id) = note_id(&post.post_url) {
                    post.id = id.to_string();
                }
            }
            Some(post)
        })
        .collect()
}

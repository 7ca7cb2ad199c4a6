//! `xhs search`

use anyhow::Result;
use serde::Serialize;
use tracing::warn;

use super::{client_info, connect_first};
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{ClientInfo, Config, XhsPost};
use crate::services::XhsService;

#[derive(Debug, Serialize)]
pub struct SearchReport {
    pub keyword: String,
    pub posts: Vec<XhsPost>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_note: Option<String>,
}

impl CommandOutput for SearchReport {
    fn to_human(&self) -> String {
        if self.posts.is_empty() {
            return format!("No posts found for '{}'", self.keyword);
        }
        let mut out = TableFormatter::new().format_posts(&self.posts);
        if let Some(note) = &self.first_note {
            out.push_str("\n\nFirst post:\n");
            out.push_str(note);
        }
        out
    }
}

pub async fn search(config: &Config, keyword: &str, limit: u32, skip_login: bool, json: bool) -> Result<()> {
    let (mut registry, session) = connect_first(config, &config.mcp.xhs_servers, "content-search").await?;
    let service = XhsService::new(session);

    let result = run_search(&service, &client_info(config), keyword, limit, skip_login).await;
    registry.close_all().await;

    output(&result?, json);
    Ok(())
}

async fn run_search(
    service: &XhsService,
    client: &ClientInfo,
    keyword: &str,
    limit: u32,
    skip_login: bool,
) -> Result<SearchReport> {
    service.initialize(&client.name, &client.version).await?;

    if !skip_login {
        if let Err(e) = service.login().await {
            warn!(error = %e, "login failed, continuing without it");
        }
    }

    let posts = service.get_posts_by_keyword(keyword, limit).await?;

    let mut first_note = None;
    if !skip_login {
        if let Some(post) = posts.first() {
            match service.get_note_content(&post.post_url).await {
                Ok(content) => first_note = Some(content),
                Err(e) => warn!(url = %post.post_url, error = %e, "failed to fetch note content"),
            }
        }
    }

    Ok(SearchReport {
        keyword: keyword.to_string(),
        posts,
        first_note,
    })
}

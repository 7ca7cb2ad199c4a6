//! Content-search endpoints: `/api/xhs/*`

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::ApiError;
use super::params::{flag, non_empty, positive_u32_or};
use super::readiness::Readiness;
use super::server::AppState;
use super::DataResponse;
use crate::domain::errors::GatewayResult;
use crate::domain::models::post::XhsPost;
use crate::domain::models::tool::ClientInfo;
use crate::services::xhs_service::{HOT_KEYWORD, XhsService};

const DEFAULT_HOT_LIMIT: u32 = 10;
const DEFAULT_LINKS_LIMIT: u32 = 5;

/// Content-search handler state
pub struct XhsApi {
    service: XhsService,
    readiness: Readiness,
    login_on_first_use: bool,
}

impl XhsApi {
    pub fn new(service: XhsService, client: ClientInfo, login_on_first_use: bool) -> Self {
        Self {
            service,
            readiness: Readiness::new(client),
            login_on_first_use,
        }
    }

    /// Initialize the session once, logging in on first use when configured.
    async fn ensure_ready(&self) -> GatewayResult<()> {
        let service = &self.service;
        let login = self.login_on_first_use;
        self.readiness
            .ensure(|client| async move {
                service.initialize(&client.name, &client.version).await?;
                if login {
                    best_effort_login(service).await;
                }
                Ok(())
            })
            .await
    }
}

async fn best_effort_login(service: &XhsService) {
    if let Err(e) = service.login().await {
        warn!(error = %e, "login failed, continuing without it");
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct HotParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
    #[serde(default)]
    pub skip_login: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LinksResponse {
    pub links: Vec<String>,
}

/// `GET /api/xhs/hot`: hot posts, or a keyword search when `q` is set.
pub async fn get_hot(
    State(state): State<AppState>,
    Query(params): Query<HotParams>,
) -> Result<Json<DataResponse<Vec<XhsPost>>>, ApiError> {
    let api = state.xhs()?;
    api.ensure_ready().await?;

    if !flag(params.skip_login.as_deref(), "true") {
        best_effort_login(&api.service).await;
    }

    let limit = positive_u32_or(params.limit.as_deref(), DEFAULT_HOT_LIMIT);
    let posts = match non_empty(params.q.as_deref()) {
        Some(keyword) => api.service.get_posts_by_keyword(keyword, limit).await?,
        None => api.service.get_hot_posts(limit).await?,
    };
    Ok(Json(DataResponse::new(posts)))
}

/// `GET /api/xhs/links`: post URLs only.
pub async fn search_links(
    State(state): State<AppState>,
    Query(params): Query<HotParams>,
) -> Result<Json<LinksResponse>, ApiError> {
    let api = state.xhs()?;
    api.ensure_ready().await?;

    if !flag(params.skip_login.as_deref(), "false") {
        best_effort_login(&api.service).await;
    }

    let keyword = non_empty(params.q.as_deref()).unwrap_or(HOT_KEYWORD);
    let limit = positive_u32_or(params.limit.as_deref(), DEFAULT_LINKS_LIMIT);
    let posts = api.service.get_posts_by_keyword(keyword, limit).await?;

    let links = posts
        .into_iter()
        .map(|post| post.post_url)
        .filter(|url| !url.is_empty())
        .collect();
    Ok(Json(LinksResponse { links }))
}

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::extract::Request;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info_span;
use uuid::Uuid;

use super::baidu_maps::{self, BaiduMapsApi};
use super::error::ApiError;
use super::travel::{self, TravelApi};
use super::xhs::{self, XhsApi};
use crate::domain::errors::GatewayError;
use crate::domain::models::config::ServerConfig;

/// Shared state for the gateway handlers
///
/// A missing API answers its routes with 503.
#[derive(Clone, Default)]
pub struct AppState {
    xhs: Option<Arc<XhsApi>>,
    travel: Option<Arc<TravelApi>>,
    baidu_maps: Option<Arc<BaiduMapsApi>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_xhs(mut self, api: XhsApi) -> Self {
        self.xhs = Some(Arc::new(api));
        self
    }

    #[must_use]
    pub fn with_travel(mut self, api: TravelApi) -> Self {
        self.travel = Some(Arc::new(api));
        self
    }

    #[must_use]
    pub fn with_baidu_maps(mut self, api: BaiduMapsApi) -> Self {
        self.baidu_maps = Some(Arc::new(api));
        self
    }

    pub(super) fn xhs(&self) -> Result<&XhsApi, ApiError> {
        self.xhs
            .as_deref()
            .ok_or_else(|| GatewayError::ClientUnavailable("xhs").into())
    }

    pub(super) fn travel(&self) -> Result<&TravelApi, ApiError> {
        self.travel
            .as_deref()
            .ok_or_else(|| GatewayError::ClientUnavailable("maps").into())
    }

    pub(super) fn baidu_maps(&self) -> Result<&BaiduMapsApi, ApiError> {
        self.baidu_maps
            .as_deref()
            .ok_or_else(|| GatewayError::ClientUnavailable("baidu maps").into())
    }
}

/// Gateway HTTP server.
pub struct GatewayHttpServer {
    config: ServerConfig,
    state: AppState,
}

impl GatewayHttpServer {
    pub fn new(state: AppState, config: ServerConfig) -> Self {
        Self { config, state }
    }

    /// Build the router.
    pub fn build_router(&self) -> Router {
        let app = Router::new()
            .route("/api/xhs/hot", get(xhs::get_hot))
            .route("/api/xhs/links", get(xhs::search_links))
            .route("/api/travel/nearby", get(travel::get_nearby))
            .route("/api/baidu-maps/geocode", get(baidu_maps::geocode))
            .route("/api/baidu-maps/reverse-geocode", get(baidu_maps::reverse_geocode))
            .route("/api/baidu-maps/search-places", get(baidu_maps::search_places))
            .route("/api/baidu-maps/directions", get(baidu_maps::directions))
            .route("/api/baidu-maps/weather", get(baidu_maps::weather))
            .route("/api/baidu-maps/ip-location", get(baidu_maps::ip_location))
            .route("/api/baidu-maps/traffic", get(baidu_maps::traffic))
            .route("/health", get(health_check))
            .with_state(self.state.clone());

        let trace = TraceLayer::new_for_http().make_span_with(|request: &Request| {
            info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %Uuid::new_v4(),
            )
        });

        if self.config.enable_cors {
            app.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
                .layer(trace)
        } else {
            app.layer(trace)
        }
    }

    /// Start the server with a shutdown signal.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.config.host, self.config.port))?;
        let router = self.build_router();

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        tracing::info!(%addr, "gateway HTTP server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}

async fn health_check() -> &'static str {
    "OK"
}

//! `serve`: run the HTTP gateway until Ctrl-C

use anyhow::Result;
use tracing::{info, warn};

use super::{build_registry, client_info};
use crate::adapters::http::{AppState, BaiduMapsApi, GatewayHttpServer, TravelApi, XhsApi};
use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;
use crate::services::{BaiduMapsService, MapsService, XhsService};

pub async fn execute(mut config: Config, port: Option<u16>) -> Result<()> {
    if let Some(port) = port {
        config.server.port = port;
        ConfigLoader::validate(&config)?;
    }

    let mut registry = build_registry(&config).await?;
    let client = client_info(&config);
    let settings = &config.mcp;

    let Some(xhs) = registry.find_first(&settings.xhs_servers) else {
        registry.close_all().await;
        anyhow::bail!(
            "No content-search MCP server configured (looked for {})",
            settings.xhs_servers.join(", ")
        );
    };
    let mut state = AppState::new().with_xhs(XhsApi::new(
        XhsService::new(xhs),
        client.clone(),
        settings.login_on_first_use,
    ));

    match registry.find_first(&settings.maps_servers) {
        Some(session) => {
            state = state.with_travel(TravelApi::new(MapsService::new(session), client.clone()));
        }
        None => warn!(candidates = ?settings.maps_servers, "maps MCP server not configured, travel routes disabled"),
    }

    match registry.find_first(&settings.baidu_maps_servers) {
        Some(session) => {
            state = state.with_baidu_maps(BaiduMapsApi::new(BaiduMapsService::new(session), client));
        }
        None => warn!(
            candidates = ?settings.baidu_maps_servers,
            "Baidu maps MCP server not configured, baidu-maps routes disabled"
        ),
    }

    let server = GatewayHttpServer::new(state, config.server.clone());
    let result = server.serve_with_shutdown(shutdown_signal()).await;

    registry.close_all().await;
    info!("gateway stopped");
    result
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => warn!(error = %e, "failed to listen for Ctrl-C, shutting down"),
    }
}

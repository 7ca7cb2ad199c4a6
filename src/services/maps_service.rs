use std::sync::Arc;
use tracing::instrument;

use super::tool_calls::ToolCall;
use crate::domain::errors::{GatewayError, GatewayResult};
use crate::domain::models::maps::Attraction;
use crate::domain::ports::mcp_client::{McpError, ToolSession};

/// Nearby-attraction lookups over the `maps` tool server
#[derive(Clone)]
pub struct MapsService {
    session: Arc<dyn ToolSession>,
}

impl MapsService {
    pub fn new(session: Arc<dyn ToolSession>) -> Self {
        Self { session }
    }

    pub async fn initialize(&self, client_name: &str, client_version: &str) -> Result<(), McpError> {
        self.session.initialize(client_name, client_version).await
    }

    /// Attractions within `radius_km` of a point
    ///
    /// The tool must answer with a JSON array; anything else is a decode
    /// error, never an empty list.
    #[instrument(skip(self), fields(server_name = self.session.server_name()))]
    pub async fn get_nearby_attractions(
        &self,
        lat: f64,
        lng: f64,
        radius_km: f64,
    ) -> GatewayResult<Vec<Attraction>> {
        let call = ToolCall::MapsNearby { lat, lng, radius_km };
        call.validate()?;
        let raw = self.session.call_tool(call.name(), call.arguments()).await?;
        serde_json::from_str(&raw).map_err(|e| GatewayError::decode("attractions", &raw, &e))
    }

    pub async fn close(&self) -> Result<(), McpError> {
        self.session.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mcp::MockToolSession;

    async fn service_with(output: &str) -> (MapsService, Arc<MockToolSession>) {
        let session = Arc::new(MockToolSession::new("maps"));
        session.respond("maps.nearby", output);
        session.initialize("test", "0.1").await.unwrap();
        (MapsService::new(session.clone()), session)
    }

    #[tokio::test]
    async fn test_decodes_attractions() {
        let (service, session) = service_with(
            r#"[{"name":"Cafe","latitude":31.23,"longitude":121.47,"address":"X","distance_km":0.1,"place_id":"p1"}]"#,
        )
        .await;

        let items = service.get_nearby_attractions(31.23, 121.47, 5.0).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].place_id, "p1");

        let args = &session.calls_to("maps.nearby")[0].arguments;
        assert_eq!(args["radius_km"], 5.0);
    }

    #[tokio::test]
    async fn test_malformed_json_is_decode_error() {
        let (service, _) = service_with("Sorry, no attractions nearby").await;
        let err = service.get_nearby_attractions(31.23, 121.47, 5.0).await.unwrap_err();
        assert!(matches!(err, GatewayError::Decode { context: "attractions", .. }));
    }

    #[tokio::test]
    async fn test_empty_array_is_ok() {
        let (service, _) = service_with("[]").await;
        assert!(service.get_nearby_attractions(0.0, 0.0, 1.0).await.unwrap().is_empty());
    }
}

//! Baidu Maps facade
//!
//! Every lookup maps onto one `map_*` tool. Results are decoded from the
//! tool's JSON text; geocode and weather additionally check the upstream
//! `status` field.

use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{instrument, warn};

use super::tool_calls::{PlaceSearch, ToolCall};
use crate::domain::errors::{GatewayError, GatewayResult};
use crate::domain::models::maps::{
    DirectionsResult, GeocodeResult, IpLocationResult, Place, ReverseGeocodeResult, TrafficResult,
    WeatherResult,
};
use crate::domain::ports::mcp_client::{McpError, ToolSession};

#[derive(Clone)]
pub struct BaiduMapsService {
    session: Arc<dyn ToolSession>,
}

impl BaiduMapsService {
    pub fn new(session: Arc<dyn ToolSession>) -> Self {
        Self { session }
    }

    pub async fn initialize(&self, client_name: &str, client_version: &str) -> Result<(), McpError> {
        self.session.initialize(client_name, client_version).await
    }

    /// Resolve an address to coordinates. A nonzero status is an error.
    pub async fn geocode(&self, address: &str) -> GatewayResult<GeocodeResult> {
        let result: GeocodeResult = self
            .fetch(
                ToolCall::Geocode {
                    address: address.to_string(),
                },
                "geocode result",
            )
            .await?;
        if result.status != 0 {
            return Err(GatewayError::DomainStatus {
                api: "geocode",
                status: result.status,
                message: None,
            });
        }
        Ok(result)
    }

    pub async fn reverse_geocode(&self, lat: f64, lng: f64) -> GatewayResult<ReverseGeocodeResult> {
        self.fetch(ToolCall::ReverseGeocode { lat, lng }, "reverse geocode result")
            .await
    }

    pub async fn search_places(&self, search: PlaceSearch) -> GatewayResult<Vec<Place>> {
        self.fetch(ToolCall::SearchPlaces(search), "places result").await
    }

    pub async fn get_directions(
        &self,
        origin: &str,
        destination: &str,
        mode: &str,
    ) -> GatewayResult<DirectionsResult> {
        let call = ToolCall::Directions {
            origin: origin.to_string(),
            destination: destination.to_string(),
            mode: mode.to_string(),
        };
        self.fetch(call, "directions result").await
    }

    /// Weather for a city name or a `"lat,lng"` pair
    ///
    /// Empty `district_id` / `is_china` are left out of the tool arguments.
    /// A nonzero upstream status is an error carrying the upstream message.
    pub async fn get_weather(
        &self,
        location: &str,
        district_id: &str,
        is_china: &str,
    ) -> GatewayResult<WeatherResult> {
        let call = ToolCall::Weather {
            location: location.to_string(),
            district_id: Some(district_id.to_string()),
            is_china: Some(is_china.to_string()),
        };
        let result: WeatherResult = self.fetch(call, "weather result").await?;
        if result.status != 0 {
            warn!(status = result.status, message = %result.message, "weather lookup rejected upstream");
            return Err(GatewayError::DomainStatus {
                api: "weather",
                status: result.status,
                message: Some(result.message),
            });
        }
        Ok(result)
    }

    pub async fn get_ip_location(&self, ip: &str) -> GatewayResult<IpLocationResult> {
        self.fetch(ToolCall::IpLocation { ip: ip.to_string() }, "IP location result")
            .await
    }

    pub async fn get_traffic(&self, road: &str, city: &str) -> GatewayResult<TrafficResult> {
        let call = ToolCall::RoadTraffic {
            road: road.to_string(),
            city: city.to_string(),
        };
        self.fetch(call, "traffic result").await
    }

    pub async fn close(&self) -> Result<(), McpError> {
        self.session.close().await
    }

    #[instrument(skip(self, call), fields(tool_name = call.name(), server_name = self.session.server_name()))]
    async fn fetch<T: DeserializeOwned>(&self, call: ToolCall, context: &'static str) -> GatewayResult<T> {
        call.validate()?;
        let raw = self.session.call_tool(call.name(), call.arguments()).await?;
        serde_json::from_str(&raw).map_err(|e| GatewayError::decode(context, &raw, &e))
    }
}

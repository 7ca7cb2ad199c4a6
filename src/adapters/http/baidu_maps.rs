//! Map endpoints under `/api/baidu-maps/*`
//!
//! Each handler checks its own parameters before touching the session, so
//! a malformed request gets a 400 even while the upstream is unavailable.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use super::error::ApiError;
use super::params::{coordinate, lat_lng, non_empty};
use super::readiness::Readiness;
use super::server::AppState;
use super::DataResponse;
use crate::domain::errors::GatewayResult;
use crate::domain::models::maps::{
    DirectionsResult, GeocodeResult, IpLocationResult, Place, ReverseGeocodeResult, TrafficResult,
    WeatherResult,
};
use crate::domain::models::tool::ClientInfo;
use crate::services::baidu_maps_service::BaiduMapsService;
use crate::services::tool_calls::PlaceSearch;

pub struct BaiduMapsApi {
    service: BaiduMapsService,
    readiness: Readiness,
}

impl BaiduMapsApi {
    pub fn new(service: BaiduMapsService, client: ClientInfo) -> Self {
        Self {
            service,
            readiness: Readiness::new(client),
        }
    }

    async fn ready(state: &AppState) -> Result<&Self, ApiError> {
        let api = state.baidu_maps()?;
        api.ensure_ready().await?;
        Ok(api)
    }

    async fn ensure_ready(&self) -> GatewayResult<()> {
        let service = &self.service;
        self.readiness
            .ensure(|client| async move {
                service.initialize(&client.name, &client.version).await?;
                Ok(())
            })
            .await
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct GeocodeParams {
    #[serde(default)]
    pub address: Option<String>,
}

pub async fn geocode(
    State(state): State<AppState>,
    Query(params): Query<GeocodeParams>,
) -> Result<Json<DataResponse<GeocodeResult>>, ApiError> {
    let address = non_empty(params.address.as_deref())
        .ok_or_else(|| ApiError::bad_request("address parameter is required"))?;

    let api = BaiduMapsApi::ready(&state).await?;
    Ok(Json(DataResponse::new(api.service.geocode(address).await?)))
}

#[derive(Debug, Default, Deserialize)]
pub struct CoordinateParams {
    #[serde(default)]
    pub lat: Option<String>,
    #[serde(default)]
    pub lng: Option<String>,
}

pub async fn reverse_geocode(
    State(state): State<AppState>,
    Query(params): Query<CoordinateParams>,
) -> Result<Json<DataResponse<ReverseGeocodeResult>>, ApiError> {
    let lat = coordinate(params.lat.as_deref(), "lat")?;
    let lng = coordinate(params.lng.as_deref(), "lng")?;

    let api = BaiduMapsApi::ready(&state).await?;
    Ok(Json(DataResponse::new(api.service.reverse_geocode(lat, lng).await?)))
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchPlacesParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub radius: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub is_china: Option<String>,
}

impl SearchPlacesParams {
    fn into_search(self) -> Result<PlaceSearch, ApiError> {
        let query = non_empty(self.q.as_deref())
            .ok_or_else(|| ApiError::bad_request("q parameter is required"))?
            .to_string();

        let radius = match self.radius.as_deref().filter(|r| !r.is_empty()) {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| ApiError::bad_request("invalid radius parameter"))?,
            None => 0,
        };

        let mut search = PlaceSearch::new(query);
        search.tag = self.tag.unwrap_or_default();
        if let Some(region) = self.region {
            search.region = region;
        }
        search.location = self.location.unwrap_or_default();
        search.radius = radius;
        search.language = self.language.unwrap_or_default();
        if let Some(is_china) = self.is_china {
            search.is_china = is_china;
        }
        Ok(search)
    }
}

pub async fn search_places(
    State(state): State<AppState>,
    Query(params): Query<SearchPlacesParams>,
) -> Result<Json<DataResponse<Vec<Place>>>, ApiError> {
    let search = params.into_search()?;

    let api = BaiduMapsApi::ready(&state).await?;
    Ok(Json(DataResponse::new(api.service.search_places(search).await?)))
}

#[derive(Debug, Default, Deserialize)]
pub struct DirectionsParams {
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
}

pub async fn directions(
    State(state): State<AppState>,
    Query(params): Query<DirectionsParams>,
) -> Result<Json<DataResponse<DirectionsResult>>, ApiError> {
    let (Some(origin), Some(destination)) = (
        non_empty(params.origin.as_deref()),
        non_empty(params.destination.as_deref()),
    ) else {
        return Err(ApiError::bad_request(
            "origin and destination parameters are required",
        ));
    };
    let mode = params.mode.as_deref().unwrap_or("driving");

    let api = BaiduMapsApi::ready(&state).await?;
    let result = api.service.get_directions(origin, destination, mode).await?;
    Ok(Json(DataResponse::new(result)))
}

#[derive(Debug, Default, Deserialize)]
pub struct WeatherParams {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub lat: Option<String>,
    #[serde(default)]
    pub lng: Option<String>,
    #[serde(default)]
    pub district_id: Option<String>,
    #[serde(default)]
    pub is_china: Option<String>,
}

impl WeatherParams {
    /// `"lat,lng"` when both coordinates are given, else the city name.
    fn location(&self) -> Result<String, ApiError> {
        let lat = non_empty(self.lat.as_deref());
        let lng = non_empty(self.lng.as_deref());
        if let (Some(lat), Some(lng)) = (lat, lng) {
            let invalid = |_| ApiError::bad_request("invalid lat or lng");
            let lat = coordinate(Some(lat), "lat").map_err(invalid)?;
            let lng = coordinate(Some(lng), "lng").map_err(invalid)?;
            return Ok(lat_lng(lat, lng));
        }
        non_empty(self.city.as_deref())
            .map(str::to_string)
            .ok_or_else(|| ApiError::bad_request("city or (lat,lng) parameter is required"))
    }
}

pub async fn weather(
    State(state): State<AppState>,
    Query(params): Query<WeatherParams>,
) -> Result<Json<DataResponse<WeatherResult>>, ApiError> {
    let location = params.location()?;
    let district_id = params.district_id.as_deref().unwrap_or_default();
    let is_china = params.is_china.as_deref().unwrap_or("true");

    let api = BaiduMapsApi::ready(&state).await?;
    let result = api.service.get_weather(&location, district_id, is_china).await?;
    Ok(Json(DataResponse::new(result)))
}

#[derive(Debug, Default, Deserialize)]
pub struct IpLocationParams {
    #[serde(default)]
    pub ip: Option<String>,
}

pub async fn ip_location(
    State(state): State<AppState>,
    Query(params): Query<IpLocationParams>,
) -> Result<Json<DataResponse<IpLocationResult>>, ApiError> {
    let ip = non_empty(params.ip.as_deref())
        .ok_or_else(|| ApiError::bad_request("ip parameter is required"))?;

    let api = BaiduMapsApi::ready(&state).await?;
    Ok(Json(DataResponse::new(api.service.get_ip_location(ip).await?)))
}

#[derive(Debug, Default, Deserialize)]
pub struct TrafficParams {
    #[serde(default)]
    pub road: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

pub async fn traffic(
    State(state): State<AppState>,
    Query(params): Query<TrafficParams>,
) -> Result<Json<DataResponse<TrafficResult>>, ApiError> {
    let (Some(road), Some(city)) = (
        non_empty(params.road.as_deref()),
        non_empty(params.city.as_deref()),
    ) else {
        return Err(ApiError::bad_request("road and city parameters are required"));
    };

    let api = BaiduMapsApi::ready(&state).await?;
    Ok(Json(DataResponse::new(api.service.get_traffic(road, city).await?)))
}

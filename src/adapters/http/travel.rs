//! `GET /api/travel/nearby`

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use super::error::ApiError;
use super::params::{coordinate, positive_f64_or};
use super::readiness::Readiness;
use super::server::AppState;
use super::DataResponse;
use crate::domain::errors::GatewayResult;
use crate::domain::models::maps::Attraction;
use crate::domain::models::tool::ClientInfo;
use crate::services::maps_service::MapsService;

const DEFAULT_RADIUS_KM: f64 = 5.0;

pub struct TravelApi {
    service: MapsService,
    readiness: Readiness,
}

impl TravelApi {
    pub fn new(service: MapsService, client: ClientInfo) -> Self {
        Self {
            service,
            readiness: Readiness::new(client),
        }
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
pub struct NearbyParams {
    #[serde(default)]
    pub lat: Option<String>,
    #[serde(default)]
    pub lng: Option<String>,
    #[serde(default)]
    pub radius_km: Option<String>,
}

pub async fn get_nearby(
    State(state): State<AppState>,
    Query(params): Query<NearbyParams>,
) -> Result<Json<DataResponse<Vec<Attraction>>>, ApiError> {
    let missing = |v: &Option<String>| v.as_deref().is_none_or(str::is_empty);
    if missing(&params.lat) || missing(&params.lng) {
        return Err(ApiError::bad_request("lat and lng are required"));
    }
    let lat = coordinate(params.lat.as_deref(), "lat")?;
    let lng = coordinate(params.lng.as_deref(), "lng")?;
    let radius_km = positive_f64_or(params.radius_km.as_deref(), DEFAULT_RADIUS_KM);

    let api = state.travel()?;
    api.ensure_ready().await?;
    let items = api.service.get_nearby_attractions(lat, lng, radius_km).await?;
    Ok(Json(DataResponse::new(items)))
}

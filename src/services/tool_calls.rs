//! Typed argument builders for the tools the gateway invokes
//!
//! Each variant knows its tool name and argument shape, and can check its
//! inputs before any I/O happens.

use serde_json::{Map, Value, json};

use crate::domain::errors::{GatewayError, GatewayResult};

/// Parameters of a `map_search_places` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceSearch {
    pub query: String,
    pub tag: String,
    pub region: String,
    pub location: String,
    /// Search radius in metres; 0 leaves it to the server.
    pub radius: u32,
    pub language: String,
    pub is_china: String,
}

impl PlaceSearch {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            tag: String::new(),
            region: "全国".to_string(),
            location: String::new(),
            radius: 0,
            language: String::new(),
            is_china: "true".to_string(),
        }
    }
}

/// One tool invocation with its arguments
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    SearchNotes { keywords: String, limit: u32 },
    Login,
    GetNoteContent { url: String },
    MapsNearby { lat: f64, lng: f64, radius_km: f64 },
    Geocode { address: String },
    ReverseGeocode { lat: f64, lng: f64 },
    SearchPlaces(PlaceSearch),
    Directions { origin: String, destination: String, mode: String },
    Weather {
        location: String,
        district_id: Option<String>,
        is_china: Option<String>,
    },
    IpLocation { ip: String },
    RoadTraffic { road: String, city: String },
}

impl ToolCall {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SearchNotes { .. } => "search_notes",
            Self::Login => "login",
            Self::GetNoteContent { .. } => "get_note_content",
            Self::MapsNearby { .. } => "maps.nearby",
            Self::Geocode { .. } => "map_geocode",
            Self::ReverseGeocode { .. } => "map_reverse_geocode",
            Self::SearchPlaces(_) => "map_search_places",
            Self::Directions { .. } => "map_directions",
            Self::Weather { .. } => "map_weather",
            Self::IpLocation { .. } => "map_ip_location",
            Self::RoadTraffic { .. } => "map_road_traffic",
        }
    }

    /// The `arguments` object sent with `tools/call`.
    pub fn arguments(&self) -> Map<String, Value> {
        let value = match self {
            Self::SearchNotes { keywords, limit } => json!({"keywords": keywords, "limit": limit}),
            Self::Login => json!({}),
            Self::GetNoteContent { url } => json!({"url": url}),
            Self::MapsNearby { lat, lng, radius_km } => {
                json!({"lat": lat, "lng": lng, "radius_km": radius_km})
            }
            Self::Geocode { address } => json!({"address": address}),
            // Servers disagree on the coordinate key names; send both.
            Self::ReverseGeocode { lat, lng } => {
                json!({"lat": lat, "lng": lng, "latitude": lat, "longitude": lng})
            }
            Self::SearchPlaces(search) => json!({
                "query": search.query,
                "tag": search.tag,
                "region": search.region,
                "location": search.location,
                "radius": search.radius,
                "language": search.language,
                "is_china": search.is_china,
            }),
            Self::Directions {
                origin,
                destination,
                mode,
            } => json!({"origin": origin, "destination": destination, "mode": mode}),
            Self::Weather {
                location,
                district_id,
                is_china,
            } => {
                let mut args = json!({"location": location});
                if let Some(district_id) = non_empty(district_id.as_deref()) {
                    args["district_id"] = json!(district_id);
                }
                if let Some(is_china) = non_empty(is_china.as_deref()) {
                    args["is_china"] = json!(is_china);
                }
                args
            }
            Self::IpLocation { ip } => json!({"ip": ip}),
            Self::RoadTraffic { road, city } => json!({"road": road, "road_name": road, "city": city}),
        };
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    /// Reject arguments the tool cannot act on
    ///
    /// # Errors
    /// `GatewayError::Validation` naming the offending parameter
    pub fn validate(&self) -> GatewayResult<()> {
        match self {
            Self::SearchNotes { keywords, limit } => {
                require("keywords", keywords)?;
                if *limit == 0 {
                    return Err(invalid("limit must be positive"));
                }
            }
            Self::Login => {}
            Self::GetNoteContent { url } => require("url", url)?,
            Self::MapsNearby { lat, lng, radius_km } => {
                check_coordinates(*lat, *lng)?;
                if !radius_km.is_finite() || *radius_km <= 0.0 {
                    return Err(invalid("radius_km must be positive"));
                }
            }
            Self::Geocode { address } => require("address", address)?,
            Self::ReverseGeocode { lat, lng } => check_coordinates(*lat, *lng)?,
            Self::SearchPlaces(search) => require("query", &search.query)?,
            Self::Directions {
                origin,
                destination,
                ..
            } => {
                require("origin", origin)?;
                require("destination", destination)?;
            }
            Self::Weather { location, .. } => require("location", location)?,
            Self::IpLocation { ip } => require("ip", ip)?,
            Self::RoadTraffic { road, city } => {
                require("road", road)?;
                require("city", city)?;
            }
        }
        Ok(())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn invalid(message: impl Into<String>) -> GatewayError {
    GatewayError::Validation(message.into())
}

fn require(field: &str, value: &str) -> GatewayResult<()> {
    if value.trim().is_empty() {
        return Err(invalid(format!("{field} is required")));
    }
    Ok(())
}

fn check_coordinates(lat: f64, lng: f64) -> GatewayResult<()> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(invalid(format!("latitude out of range: {lat}")));
    }
    if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
        return Err(invalid(format!("longitude out of range: {lng}")));
    }
    Ok(())
}

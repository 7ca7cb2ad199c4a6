//! Value objects decoded from the mapping tool servers.
//!
//! Field names mirror the upstream JSON. Missing fields decode to their
//! zero values; a payload that is not JSON, or has a field of the wrong type,
//! fails to decode.

use serde::{Deserialize, Serialize};

/// A point of interest returned by `maps.nearby`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attraction {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub distance_km: f64,
    pub place_id: String,
}

/// Result of `map_geocode`.
///
/// Example: `{"status":0,"result":{"location":{"lng":116.30,"lat":40.05},"precise":1,"confidence":80,"comprehension":100,"level":"门址"}}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodeResult {
    pub status: i64,
    pub result: GeocodeDetail,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodeDetail {
    pub location: GeocodeLocation,
    pub precise: i64,
    pub confidence: i64,
    pub comprehension: i64,
    pub level: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodeLocation {
    pub lng: f64,
    pub lat: f64,
}

/// Result of `map_reverse_geocode`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReverseGeocodeResult {
    pub formatted_address: String,
    pub uid: String,
    pub address_component: AddressComponent,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressComponent {
    pub country: String,
    pub province: String,
    pub city: String,
    pub district: String,
    pub street: String,
}

/// One entry of a `map_search_places` result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Place {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub uid: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Result of `map_directions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionsResult {
    pub distance: String,
    pub duration: String,
    pub route: String,
}

/// Result of `map_weather`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherResult {
    pub status: i64,
    pub message: String,
    pub result: WeatherDetail,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherDetail {
    pub location: WeatherLocation,
    pub now: WeatherNow,
    pub indexes: Vec<WeatherIndex>,
    pub alerts: Vec<WeatherAlert>,
    pub forecasts: Vec<DailyForecast>,
    pub forecast_hours: Vec<HourlyForecast>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherLocation {
    pub country: String,
    pub province: String,
    pub city: String,
    pub name: String,
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherNow {
    pub text: String,
    pub temp: i64,
    pub feels_like: i64,
    pub rh: i64,
    pub wind_class: String,
    pub wind_dir: String,
    pub prec_1h: f64,
    pub clouds: i64,
    pub vis: i64,
    pub aqi: i64,
    pub pm25: i64,
    pub pm10: i64,
    pub no2: i64,
    pub so2: i64,
    pub o3: i64,
    pub co: f64,
    pub wind_angle: i64,
    pub uvi: i64,
    pub pressure: i64,
    pub dpt: i64,
    pub uptime: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherIndex {
    pub name: String,
    pub brief: String,
    pub detail: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherAlert {
    #[serde(rename = "type")]
    pub kind: String,
    pub level: String,
    pub title: String,
    pub desc: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyForecast {
    pub text_day: String,
    pub text_night: String,
    pub high: i64,
    pub low: i64,
    pub wc_day: String,
    pub wd_day: String,
    pub wc_night: String,
    pub wd_night: String,
    pub date: String,
    pub week: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HourlyForecast {
    pub text: String,
    pub temp_fc: i64,
    pub wind_class: String,
    pub wind_dir: String,
    pub rh: i64,
    pub prec_1h: f64,
    pub clouds: i64,
    pub wind_angle: i64,
    pub pop: i64,
    pub uvi: i64,
    pub pressure: i64,
    pub dpt: i64,
    pub data_time: String,
}

/// Result of `map_ip_location`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpLocationResult {
    pub ip: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Result of `map_road_traffic`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficResult {
    pub road_name: String,
    pub status: String,
    pub speed: String,
}

//! `maps search-places` and `maps weather`
//!
//! Both print the decoded result as pretty JSON.

use anyhow::{Context, Result};
use serde::Serialize;

use super::{client_info, connect_first};
use crate::adapters::http::params::lat_lng;
use crate::domain::models::Config;
use crate::services::{BaiduMapsService, PlaceSearch};

/// Where a weather lookup points.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherTarget {
    City(String),
    Coordinates { lat: f64, lng: f64 },
}

impl WeatherTarget {
    /// Coordinates win over a city when both are given.
    pub fn from_args(city: Option<String>, lat: Option<f64>, lng: Option<f64>) -> Result<Self> {
        match (lat, lng, city) {
            (Some(lat), Some(lng), _) => Ok(Self::Coordinates { lat, lng }),
            (_, _, Some(city)) if !city.trim().is_empty() => Ok(Self::City(city)),
            _ => anyhow::bail!("--city or both --lat and --lng are required"),
        }
    }

    fn location(&self) -> String {
        match self {
            Self::City(city) => city.clone(),
            Self::Coordinates { lat, lng } => lat_lng(*lat, *lng),
        }
    }
}

pub async fn search_places(config: &Config, search: PlaceSearch) -> Result<()> {
    with_service(config, |service| async move {
        let places = service.search_places(search).await?;
        print_json(&places)
    })
    .await
}

pub async fn weather(config: &Config, target: WeatherTarget, district_id: Option<String>) -> Result<()> {
    let location = target.location();
    let district_id = district_id.unwrap_or_default();
    with_service(config, |service| async move {
        let result = service.get_weather(&location, &district_id, "true").await?;
        print_json(&result)
    })
    .await
}

/// Connect, initialize, run `f`, and always close the registry.
async fn with_service<F, Fut>(config: &Config, f: F) -> Result<()>
where
    F: FnOnce(BaiduMapsService) -> Fut,
    Fut: std::future::Future<Output = Result<()>>,
{
    let (mut registry, session) =
        connect_first(config, &config.mcp.baidu_maps_servers, "Baidu maps").await?;
    let service = BaiduMapsService::new(session);
    let client = client_info(config);

    let result = match service.initialize(&client.name, &client.version).await {
        Ok(()) => f(service).await,
        Err(e) => Err(e).context("Failed to initialize Baidu maps MCP server"),
    };

    registry.close_all().await;
    result
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_target_prefers_coordinates() {
        let target = WeatherTarget::from_args(Some("北京".into()), Some(39.9), Some(116.4)).unwrap();
        assert_eq!(target, WeatherTarget::Coordinates { lat: 39.9, lng: 116.4 });
        assert_eq!(target.location(), "39.9,116.4");
    }

    #[test]
    fn test_weather_target_city() {
        let target = WeatherTarget::from_args(Some("杭州".into()), None, None).unwrap();
        assert_eq!(target.location(), "杭州");
        assert!(WeatherTarget::from_args(Some("  ".into()), Some(1.0), None).is_err());
    }
}

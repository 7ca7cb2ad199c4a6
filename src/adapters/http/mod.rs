//! HTTP surface of the gateway.

pub mod baidu_maps;
pub mod error;
pub mod params;
pub mod readiness;
pub mod server;
pub mod travel;
pub mod xhs;

use serde::Serialize;

pub use baidu_maps::BaiduMapsApi;
pub use error::{ApiError, ErrorResponse};
pub use readiness::Readiness;
pub use server::{AppState, GatewayHttpServer};
pub use travel::TravelApi;
pub use xhs::XhsApi;

/// Success body: `{"data": ...}`.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

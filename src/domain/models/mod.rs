pub mod config;
pub mod maps;
pub mod mcp_server;
pub mod post;
pub mod tool;

pub use config::{Config, LoggingConfig, McpSettings, ServerConfig};
pub use maps::{
    AddressComponent, Attraction, DirectionsResult, GeocodeLocation, GeocodeResult,
    IpLocationResult, Place, ReverseGeocodeResult, TrafficResult, WeatherResult,
};
pub use mcp_server::{McpServerEntry, McpServersConfig, ServerDescriptor, TransportKind};
pub use post::XhsPost;
pub use tool::{ClientInfo, ToolContent, ToolInfo};

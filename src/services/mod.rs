pub mod baidu_maps_service;
pub mod maps_service;
pub mod post_parser;
pub mod tool_calls;
pub mod xhs_service;

pub use baidu_maps_service::BaiduMapsService;
pub use maps_service::MapsService;
pub use post_parser::{ParseStrategy, normalize_post_url, parse_search_output};
pub use tool_calls::{PlaceSearch, ToolCall};
pub use xhs_service::XhsService;

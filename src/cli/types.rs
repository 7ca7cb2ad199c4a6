//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "photo-gateway")]
#[command(about = "Photo backend gateway over MCP tool servers", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file used in place of photo-gateway.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// MCP server document (overrides mcp.config_path)
    #[arg(long, global = true)]
    pub mcp_config: Option<String>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP gateway
    Serve {
        /// Listen port (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// MCP server diagnostics
    #[command(subcommand)]
    Mcp(McpCommands),

    /// Content-search commands
    #[command(subcommand)]
    Xhs(XhsCommands),

    /// Map lookups through the Baidu maps server
    #[command(subcommand)]
    Maps(MapsCommands),
}

#[derive(Subcommand)]
pub enum McpCommands {
    /// Start one configured server, handshake, ping and list its tools
    Probe {
        /// Key of the server in the MCP document
        #[arg(short, long)]
        server: String,
    },
}

#[derive(Subcommand)]
pub enum XhsCommands {
    /// Search posts by keyword
    Search {
        /// Search keyword
        #[arg(short = 'q', long = "query", default_value = "热门")]
        query: String,

        /// Maximum number of posts
        #[arg(short, long, default_value = "5")]
        limit: u32,

        /// Skip the login step and the follow-up content fetch
        #[arg(long)]
        skip_login: bool,
    },
}

#[derive(Subcommand)]
pub enum MapsCommands {
    /// Search places by keyword
    SearchPlaces {
        /// Search keyword
        query: String,

        /// Place category, e.g. 美食
        #[arg(short, long)]
        tag: Option<String>,

        /// Region to search in
        #[arg(short, long, default_value = "全国")]
        region: String,

        /// Centre point as "lat,lng" for a radius search
        #[arg(long)]
        location: Option<String>,

        /// Radius in metres around --location
        #[arg(long)]
        radius: Option<u32>,
    },

    /// Current weather and forecast
    Weather {
        /// City name
        #[arg(long, required_unless_present_all = ["lat", "lng"])]
        city: Option<String>,

        #[arg(long, requires = "lng", allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lng: Option<f64>,

        /// Administrative district code
        #[arg(long)]
        district_id: Option<String>,
    },
}

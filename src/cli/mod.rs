//! Command-line interface
//!
//! Every command loads the application config first and installs logging
//! from it, then dispatches to its handler in [`commands`].

pub mod commands;
pub mod output;
pub mod types;

use anyhow::Result;
use console::style;

pub use types::{Cli, Commands, MapsCommands, McpCommands, XhsCommands};

use crate::infrastructure::logging::{LogConfig, LoggerImpl};
use crate::services::PlaceSearch;
use commands::maps::WeatherTarget;

/// Load config, install logging and run the selected command.
pub async fn run(cli: Cli) -> Result<()> {
    let mut config = commands::load_config(cli.config.as_deref())?;
    if let Some(path) = cli.mcp_config {
        config.mcp.config_path = Some(path);
    }

    let _logger = LoggerImpl::init(&LogConfig::from_settings(&config.logging)?)?;

    match cli.command {
        Commands::Serve { port } => commands::serve::execute(config, port).await,
        Commands::Mcp(McpCommands::Probe { server }) => {
            commands::mcp::probe(&config, &server, cli.json).await
        }
        Commands::Xhs(XhsCommands::Search {
            query,
            limit,
            skip_login,
        }) => commands::xhs::search(&config, &query, limit, skip_login, cli.json).await,
        Commands::Maps(MapsCommands::SearchPlaces {
            query,
            tag,
            region,
            location,
            radius,
        }) => {
            let mut search = PlaceSearch::new(query);
            search.tag = tag.unwrap_or_default();
            search.region = region;
            search.location = location.unwrap_or_default();
            search.radius = radius.unwrap_or_default();
            commands::maps::search_places(&config, search).await
        }
        Commands::Maps(MapsCommands::Weather {
            city,
            lat,
            lng,
            district_id,
        }) => {
            let target = WeatherTarget::from_args(city, lat, lng)?;
            commands::maps::weather(&config, target, district_id).await
        }
    }
}

/// Print the error chain and exit with status 1.
pub fn handle_error(err: &anyhow::Error, json: bool) -> ! {
    if json {
        let body = serde_json::json!({ "error": format!("{err:#}") });
        println!("{body}");
    } else {
        eprintln!("{} {err}", style("Error:").red().bold());
        for cause in err.chain().skip(1) {
            eprintln!("  {} {cause}", style("caused by:").dim());
        }
    }
    std::process::exit(1)
}

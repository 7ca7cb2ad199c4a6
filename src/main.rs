//! Photo Gateway CLI entry point.

use clap::Parser;

use photo_gateway::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(err) = photo_gateway::cli::run(cli).await {
        photo_gateway::cli::handle_error(&err, json);
    }
}

use bus_route_resolver::cli::{self, Cli, Command};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Route(args) => cli::route::run_route(args).await,
        Command::Distance(args) => cli::route::run_distance(args),
    }
}

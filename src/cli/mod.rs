//! CLI module for the bus route resolver
//!
//! - `serve`: HTTP service (default deployment mode)
//! - `route`: resolve one path and print it
//! - `distance`: length of a path, no network access

pub mod route;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;

/// Bus Route Resolver - cached, throttled road paths between stops
#[derive(Parser)]
#[command(name = "bus-route-resolver")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP service
    Serve,

    /// Resolve the road path between two points and print it as JSON
    Route(route::RouteArgs),

    /// Print the length of a path given as `lat,lng` points
    Distance(route::DistanceArgs),
}

/// Reads `.env`, loads layered configuration and validates it
pub(crate) fn load_config() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    config.validate()?;

    Ok(config)
}

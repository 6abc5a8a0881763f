//! CLI module for the catalog API
//!
//! - `serve`: run the HTTP server
//! - `migrate`: apply or revert schema migrations
//! - `seed`: wipe and reload the development fixtures

pub mod migrate;
pub mod seed;
pub mod serve;

use clap::{Args, Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging::init_logging;

/// Catalog API - products, users and role-guarded routes
#[derive(Parser)]
#[command(name = "catalog-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Apply pending migrations, or revert the latest one
    Migrate(MigrateArgs),

    /// Replace users and products with the fixture set (never in production)
    Seed(SeedArgs),
}

#[derive(Args, Debug, Default)]
pub struct MigrateArgs {
    /// Revert the most recent migration instead of applying
    #[arg(long)]
    pub revert: bool,
}

#[derive(Args, Debug, Default)]
pub struct SeedArgs {
    /// Enable seeding for this run even if `seed.enabled` is off
    #[arg(long)]
    pub allow_seed: bool,
}

/// Load `.env` and the layered configuration, then start logging
pub(crate) fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_logging(&config.logging);

    Ok(config)
}

//! Seed command - reloads the development fixtures

use tracing::info;

use super::SeedArgs;
use crate::api::AppState;
use crate::config::AppConfig;

pub async fn run(args: SeedArgs) -> anyhow::Result<()> {
    let mut config = super::bootstrap()?;

    if args.allow_seed {
        config.seed.enabled = true;
    }

    let (state, pool) = crate::create_app_state(&config).await?;
    let result = run_seed(&config, state).await;

    if let Some(pool) = pool {
        pool.close().await;
    }

    result
}

async fn run_seed(config: &AppConfig, state: AppState) -> anyhow::Result<()> {
    let seed = state.seed_service.ok_or_else(|| {
        anyhow::anyhow!(
            "Seeding is not allowed: environment is {:?}, seed.enabled is {}",
            config.environment,
            config.seed.enabled
        )
    })?;

    let report = seed.run().await?;
    info!(users = report.users, products = report.products, "SEED EXECUTED");

    Ok(())
}

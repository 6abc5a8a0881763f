//! Migrate command - applies or reverts the schema

use tracing::info;

use super::MigrateArgs;
use crate::infrastructure::storage::{connect_pool, Migrator, PostgresMigrator};

pub async fn run(args: MigrateArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let pool = connect_pool(&config.database.to_postgres_config()).await?;
    let migrator = PostgresMigrator::new(pool.clone());

    if args.revert {
        migrator.revert().await?;
    } else {
        migrator.run().await?;
    }

    let version = migrator.version().await?;
    info!(?version, "Schema is at version");

    pool.close().await;
    Ok(())
}

//! Storage infrastructure - connection pool, migrations and error mapping

pub mod migrations;
mod postgres;

pub use migrations::{run_storage_migrations, Migration, Migrator, PostgresMigrator};
pub use postgres::{connect_pool, map_sqlx_error, PostgresConfig, UNIQUE_VIOLATION};

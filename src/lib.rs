//! Catalog API
//!
//! A product catalog backend with:
//! - JWT authentication and role-guarded routes
//! - Product lookup by id, title or slug
//! - Transactional product updates that replace the image set
//! - A development-only seeding routine

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use api::state::AppState;
use config::StorageBackend;
use domain::product::ProductRepository;
use domain::user::UserRepository;
use infrastructure::auth::JwtService;
use infrastructure::product::{InMemoryProductRepository, PostgresProductRepository, ProductService};
use infrastructure::seed::{SeedPolicy, SeedService};
use infrastructure::storage::{connect_pool, run_storage_migrations};
use infrastructure::user::{
    Argon2Hasher, InMemoryUserRepository, PostgresUserRepository, UserService,
};

/// Create the application state for the configured storage backend.
///
/// The pool is returned alongside so the caller can close it on shutdown;
/// it is `None` for the in-memory backend.
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<(AppState, Option<PgPool>)> {
    info!("Storage backend: {:?}", config.storage.backend);

    match config.storage.backend {
        StorageBackend::Postgres => {
            info!("Connecting to PostgreSQL...");
            let pool = connect_pool(&config.database.to_postgres_config()).await?;
            info!("PostgreSQL connection established");

            if config.database.run_migrations {
                run_storage_migrations(&pool).await?;
            }

            let state = build_state(
                config,
                Arc::new(PostgresUserRepository::new(pool.clone())),
                Arc::new(PostgresProductRepository::new(pool.clone())),
            );

            Ok((state, Some(pool)))
        }
        StorageBackend::Memory => {
            let state = build_state(
                config,
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryProductRepository::new()),
            );

            Ok((state, None))
        }
    }
}

fn build_state<U, P>(config: &AppConfig, users: Arc<U>, products: Arc<P>) -> AppState
where
    U: UserRepository + 'static,
    P: ProductRepository + 'static,
{
    let user_service = Arc::new(UserService::new(users, Arc::new(Argon2Hasher::new())));
    let product_service = Arc::new(ProductService::new(products));
    let jwt_service = Arc::new(JwtService::new(config.auth.to_jwt_config()));

    let state = AppState::new(user_service.clone(), product_service.clone(), jwt_service);

    let policy = SeedPolicy::from_config(config);
    if !policy.is_allowed() {
        return state;
    }

    info!("Seeding enabled for {:?} environment", config.environment);
    state.with_seed_service(Arc::new(SeedService::new(
        user_service,
        product_service,
        policy,
    )))
}

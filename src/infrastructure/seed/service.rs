//! Development data seeding

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use super::fixtures;
use crate::config::{AppConfig, Environment};
use crate::domain::product::ProductRepository;
use crate::domain::user::UserRepository;
use crate::domain::DomainError;
use crate::infrastructure::product::ProductService;
use crate::infrastructure::user::{PasswordHasher, UserService};

/// Decides whether the destructive seed may run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedPolicy {
    pub environment: Environment,
    pub enabled: bool,
}

impl SeedPolicy {
    pub fn new(environment: Environment, enabled: bool) -> Self {
        Self {
            environment,
            enabled,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.environment, config.seed.enabled)
    }

    pub fn is_allowed(&self) -> bool {
        !self.environment.is_production() && self.enabled
    }

    pub fn check(&self) -> Result<(), DomainError> {
        if self.environment.is_production() {
            return Err(DomainError::forbidden("Seeding is disabled in production"));
        }

        if !self.enabled {
            return Err(DomainError::forbidden(
                "Seeding is not enabled, set APP__SEED__ENABLED=true",
            ));
        }

        Ok(())
    }
}

/// Outcome of a seed run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub users: usize,
    pub products: usize,
}

/// Wipes the catalog and user tables and loads the fixtures
#[derive(Debug)]
pub struct SeedService<U, H, P>
where
    U: UserRepository,
    H: PasswordHasher,
    P: ProductRepository,
{
    users: Arc<UserService<U, H>>,
    products: Arc<ProductService<P>>,
    policy: SeedPolicy,
}

impl<U, H, P> SeedService<U, H, P>
where
    U: UserRepository,
    H: PasswordHasher,
    P: ProductRepository,
{
    pub fn new(
        users: Arc<UserService<U, H>>,
        products: Arc<ProductService<P>>,
        policy: SeedPolicy,
    ) -> Self {
        Self {
            users,
            products,
            policy,
        }
    }

    pub async fn run(&self) -> Result<SeedReport, DomainError> {
        self.policy.check()?;

        let removed_products = self.products.delete_all().await?;
        let removed_users = self.users.delete_all().await?;
        info!(removed_products, removed_users, "Cleared existing data");

        let mut created_users = Vec::new();
        for (request, roles) in fixtures::users() {
            created_users.push(self.users.create_with_roles(request, roles).await?);
        }

        let owner = created_users
            .first()
            .ok_or_else(|| DomainError::internal("Seed fixtures contain no users"))?;

        let results = join_all(
            fixtures::products()
                .into_iter()
                .map(|draft| self.products.create(draft, owner)),
        )
        .await;

        let mut inserted = 0;
        let mut first_error = None;

        for result in results {
            match result {
                Ok(_) => inserted += 1,
                Err(e) => {
                    warn!(error = %e, "Failed to seed product");
                    first_error.get_or_insert(e);
                }
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        info!(users = created_users.len(), products = inserted, "Seed executed");

        Ok(SeedReport {
            users: created_users.len(),
            products: inserted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pagination::Pagination;
    use crate::domain::product::ProductDraft;
    use crate::domain::user::{Role, User};
    use crate::infrastructure::product::InMemoryProductRepository;
    use crate::infrastructure::user::{Argon2Hasher, InMemoryUserRepository};

    type TestSeedService =
        SeedService<InMemoryUserRepository, Argon2Hasher, InMemoryProductRepository>;

    fn setup(
        policy: SeedPolicy,
    ) -> (
        TestSeedService,
        Arc<UserService<InMemoryUserRepository, Argon2Hasher>>,
        Arc<ProductService<InMemoryProductRepository>>,
    ) {
        let users = Arc::new(UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(Argon2Hasher::new()),
        ));
        let products = Arc::new(ProductService::new(Arc::new(
            InMemoryProductRepository::new(),
        )));

        (
            SeedService::new(Arc::clone(&users), Arc::clone(&products), policy),
            users,
            products,
        )
    }

    #[test]
    fn test_policy() {
        assert!(SeedPolicy::new(Environment::Development, true).check().is_ok());
        assert!(SeedPolicy::new(Environment::Development, false).check().is_err());
        assert!(SeedPolicy::new(Environment::Production, true).check().is_err());
        assert!(!SeedPolicy::new(Environment::Production, true).is_allowed());
    }

    #[tokio::test]
    async fn test_refused_seed_deletes_nothing() {
        let (seed, users, products) = setup(SeedPolicy::new(Environment::Production, true));
        let owner = User::new("keep@google.com", "Keep", "hash");

        products
            .create(
                ProductDraft {
                    title: "Keep Me".to_string(),
                    slug: None,
                    price: None,
                    stock: None,
                    description: None,
                    sizes: vec![],
                    gender: crate::domain::product::Gender::Unisex,
                    tags: vec![],
                    images: vec![],
                },
                &owner,
            )
            .await
            .unwrap();

        assert!(matches!(
            seed.run().await,
            Err(DomainError::Forbidden { .. })
        ));
        assert_eq!(
            products.find_all(Pagination::default()).await.unwrap().len(),
            1
        );
        assert_eq!(users.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_seed_replaces_everything() {
        let (seed, users, products) = setup(SeedPolicy::new(Environment::Development, true));

        let first = seed.run().await.unwrap();
        let second = seed.run().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(users.count().await.unwrap(), first.users);

        let all = products
            .find_all(Pagination::new(Some(100), None).unwrap())
            .await
            .unwrap();
        assert_eq!(all.len(), first.products);

        let admin = users
            .authenticate("test1@google.com", "Abc123")
            .await
            .unwrap();
        assert!(admin.has_role(Role::Admin));
        assert!(all
            .iter()
            .all(|p| p.owner.as_ref().map(|o| o.id) == Some(*admin.id())));
    }
}

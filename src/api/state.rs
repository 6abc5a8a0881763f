//! Application state for shared services

use std::sync::Arc;

use crate::domain::pagination::Pagination;
use crate::domain::product::{PlainProduct, ProductDraft, ProductId, ProductPatch, ProductRepository};
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::auth::JwtGenerator;
use crate::infrastructure::product::ProductService;
use crate::infrastructure::seed::{SeedReport, SeedService};
use crate::infrastructure::user::{PasswordHasher, RegisterUserRequest, UserService};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub product_service: Arc<dyn ProductServiceTrait>,
    pub jwt_service: Arc<dyn JwtGenerator>,
    /// Present only when the seed policy allows seeding
    pub seed_service: Option<Arc<dyn SeedServiceTrait>>,
}

impl AppState {
    pub fn new(
        user_service: Arc<dyn UserServiceTrait>,
        product_service: Arc<dyn ProductServiceTrait>,
        jwt_service: Arc<dyn JwtGenerator>,
    ) -> Self {
        Self {
            user_service,
            product_service,
            jwt_service,
            seed_service: None,
        }
    }

    pub fn with_seed_service(mut self, seed_service: Arc<dyn SeedServiceTrait>) -> Self {
        self.seed_service = Some(seed_service);
        self
    }
}

/// Trait for user service operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn register(&self, request: RegisterUserRequest) -> Result<User, DomainError>;
    async fn authenticate(&self, email: &str, password: &str) -> Result<User, DomainError>;
    async fn get_active(&self, id: &UserId) -> Result<User, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
}

/// Trait for product service operations
#[async_trait::async_trait]
pub trait ProductServiceTrait: Send + Sync {
    async fn create(&self, draft: ProductDraft, owner: &User)
        -> Result<PlainProduct, DomainError>;
    async fn find_all(&self, page: Pagination) -> Result<Vec<PlainProduct>, DomainError>;
    async fn find_one_plain(&self, term: &str) -> Result<PlainProduct, DomainError>;
    async fn update(
        &self,
        id: &ProductId,
        patch: ProductPatch,
        actor: &User,
    ) -> Result<PlainProduct, DomainError>;
    async fn remove(&self, id: &ProductId) -> Result<(), DomainError>;
}

/// Trait for the development seed routine
#[async_trait::async_trait]
pub trait SeedServiceTrait: Send + Sync {
    async fn run(&self) -> Result<SeedReport, DomainError>;
}

#[async_trait::async_trait]
impl<R, H> UserServiceTrait for UserService<R, H>
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn register(&self, request: RegisterUserRequest) -> Result<User, DomainError> {
        UserService::register(self, request).await
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<User, DomainError> {
        UserService::authenticate(self, email, password).await
    }

    async fn get_active(&self, id: &UserId) -> Result<User, DomainError> {
        UserService::get_active(self, id).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        UserService::count(self).await
    }
}

#[async_trait::async_trait]
impl<R: ProductRepository + 'static> ProductServiceTrait for ProductService<R> {
    async fn create(
        &self,
        draft: ProductDraft,
        owner: &User,
    ) -> Result<PlainProduct, DomainError> {
        ProductService::create(self, draft, owner).await
    }

    async fn find_all(&self, page: Pagination) -> Result<Vec<PlainProduct>, DomainError> {
        ProductService::find_all(self, page).await
    }

    async fn find_one_plain(&self, term: &str) -> Result<PlainProduct, DomainError> {
        ProductService::find_one_plain(self, term).await
    }

    async fn update(
        &self,
        id: &ProductId,
        patch: ProductPatch,
        actor: &User,
    ) -> Result<PlainProduct, DomainError> {
        ProductService::update(self, id, patch, actor).await
    }

    async fn remove(&self, id: &ProductId) -> Result<(), DomainError> {
        ProductService::remove(self, id).await
    }
}

#[async_trait::async_trait]
impl<U, H, P> SeedServiceTrait for SeedService<U, H, P>
where
    U: UserRepository + 'static,
    H: PasswordHasher + 'static,
    P: ProductRepository + 'static,
{
    async fn run(&self) -> Result<SeedReport, DomainError> {
        SeedService::run(self).await
    }
}

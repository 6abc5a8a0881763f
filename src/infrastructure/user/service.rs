//! User service for registration and authentication

use std::sync::Arc;

use crate::domain::user::{
    normalize_email, validate_email, validate_full_name, validate_password, Role, User, UserId,
    UserRepository,
};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Request for registering a new user
#[derive(Debug, Clone)]
pub struct RegisterUserRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// User service for authentication and management
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: UserRepository, H: PasswordHasher> UserService<R, H> {
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// Register a user holding the default `user` role
    pub async fn register(&self, request: RegisterUserRequest) -> Result<User, DomainError> {
        self.create_with_roles(request, vec![Role::User]).await
    }

    /// Create a user with an explicit role set
    pub async fn create_with_roles(
        &self,
        request: RegisterUserRequest,
        roles: Vec<Role>,
    ) -> Result<User, DomainError> {
        validate_email(&request.email).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_full_name(&request.full_name)
            .map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(&request.password).map_err(|e| DomainError::validation(e.to_string()))?;

        let password_hash = self.hasher.hash(&request.password)?;
        let user = User::new(&request.email, request.full_name.trim(), password_hash)
            .with_roles(roles);

        self.repository.create(user).await
    }

    /// Check an email/password pair, returning the active user on success
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let user = self
            .repository
            .get_by_email(&normalize_email(email))
            .await?
            .ok_or_else(|| DomainError::unauthorized("Credentials are not valid (email)"))?;

        if !self.hasher.verify(password, user.password_hash()) {
            return Err(DomainError::unauthorized(
                "Credentials are not valid (password)",
            ));
        }

        ensure_active(user)
    }

    /// Resolve a token subject to an active user
    pub async fn get_active(&self, id: &UserId) -> Result<User, DomainError> {
        let user = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::unauthorized("Token not valid"))?;

        ensure_active(user)
    }

    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }

    pub async fn delete_all(&self) -> Result<u64, DomainError> {
        self.repository.delete_all().await
    }
}

fn ensure_active(user: User) -> Result<User, DomainError> {
    if !user.is_active() {
        return Err(DomainError::unauthorized(
            "User is inactive, talk with an admin",
        ));
    }

    Ok(user)
}

//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

#[cfg(test)]
use mockall::automock;

use super::entity::{User, UserId};
use crate::domain::DomainError;

/// Repository trait for user storage
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get a user by their ID
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by their (normalized) email, used for login
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Create a new user; a taken email is a conflict
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Count all users
    async fn count(&self) -> Result<usize, DomainError>;

    /// Remove every user, returning how many were deleted
    async fn delete_all(&self) -> Result<u64, DomainError>;
}

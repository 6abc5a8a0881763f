//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

/// In-memory implementation of UserRepository, keyed by id with a unique
/// email index enforced on insert
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository with initial users
    pub fn with_users(users: Vec<User>) -> Self {
        let users = users.into_iter().map(|user| (*user.id(), user)).collect();

        Self {
            users: Arc::new(RwLock::new(users)),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email() == email).cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if users.values().any(|existing| existing.email() == user.email()) {
            return Err(DomainError::conflict(format!(
                "Key (email)=({}) already exists.",
                user.email()
            )));
        }

        if users.contains_key(user.id()) {
            return Err(DomainError::conflict(format!(
                "Key (id)=({}) already exists.",
                user.id()
            )));
        }

        users.insert(*user.id(), user.clone());
        Ok(user)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.users.read().await.len())
    }

    async fn delete_all(&self) -> Result<u64, DomainError> {
        let mut users = self.users.write().await;
        let removed = users.len() as u64;
        users.clear();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_lookup() {
        let repo = InMemoryUserRepository::new();
        let user = User::new("test1@google.com", "Test One", "hash");
        let id = *user.id();

        repo.create(user).await.unwrap();

        assert!(repo.get(&id).await.unwrap().is_some());
        assert_eq!(
            repo.get_by_email("test1@google.com").await.unwrap().unwrap().id(),
            &id
        );
        assert!(repo.get_by_email("other@google.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let repo = InMemoryUserRepository::new();

        repo.create(User::new("dup@google.com", "One", "hash"))
            .await
            .unwrap();
        let result = repo.create(User::new("DUP@google.com", "Two", "hash")).await;

        match result {
            Err(DomainError::Conflict { message }) => {
                assert_eq!(message, "Key (email)=(dup@google.com) already exists.");
            }
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_all() {
        let repo = InMemoryUserRepository::with_users(vec![
            User::new("a@google.com", "A", "hash"),
            User::new("b@google.com", "B", "hash"),
        ]);

        assert_eq!(repo.count().await.unwrap(), 2);
        assert_eq!(repo.delete_all().await.unwrap(), 2);
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}

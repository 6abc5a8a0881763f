//! PostgreSQL user repository implementation

use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use crate::domain::user::{Role, User, UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::storage::map_sqlx_error;

const USER_COLUMNS: &str =
    "id, email, full_name, password_hash, is_active, roles, created_at, updated_at";

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to get user", e))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to get user by email", e))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let roles: Vec<&str> = user.roles().iter().map(Role::as_str).collect();

        sqlx::query(
            r#"
            INSERT INTO users (id, email, full_name, password_hash, is_active, roles,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.email())
        .bind(user.full_name())
        .bind(user.password_hash())
        .bind(user.is_active())
        .bind(&roles)
        .bind(user.created_at())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to create user", e))?;

        Ok(user)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to count users", e))?;

        Ok(count as usize)
    }

    async fn delete_all(&self) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM users")
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to delete users", e))?;

        Ok(result.rows_affected())
    }
}

fn row_to_user(row: &PgRow) -> Result<User, DomainError> {
    let id: Uuid = row.get("id");
    let roles: Vec<String> = row.get("roles");

    Ok(User::restore(
        UserId::from(id),
        row.get("email"),
        row.get("full_name"),
        row.get("password_hash"),
        row.get("is_active"),
        parse_roles(&roles)?,
        row.get("created_at"),
        row.get("updated_at"),
    ))
}

fn parse_roles(roles: &[String]) -> Result<Vec<Role>, DomainError> {
    roles
        .iter()
        .map(|role| {
            role.parse()
                .map_err(|_| DomainError::storage(format!("Unknown role '{}' in database", role)))
        })
        .collect()
}

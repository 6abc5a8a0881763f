//! User entity and related types

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// User identifier (UUID v4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its string form
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        Uuid::try_parse(value)
            .map(Self)
            .map_err(|_| DomainError::invalid_id(format!("'{}' is not a valid user id", value)))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role tags a user can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "super-user")]
    SuperUser,
    #[serde(rename = "user")]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::SuperUser => "super-user",
            Self::User => "user",
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "super-user" => Ok(Self::SuperUser),
            "user" => Ok(Self::User),
            other => Err(DomainError::validation(format!("Unknown role '{}'", other))),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User entity for authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    /// Always stored trimmed and lowercased
    email: String,
    full_name: String,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing, default)]
    password_hash: String,
    is_active: bool,
    roles: Vec<Role>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new active user holding the default `user` role
    pub fn new(
        email: impl AsRef<str>,
        full_name: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: UserId::generate(),
            email: normalize_email(email.as_ref()),
            full_name: full_name.into(),
            password_hash: password_hash.into(),
            is_active: true,
            roles: vec![Role::User],
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a user from persisted state
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: UserId,
        email: String,
        full_name: String,
        password_hash: String,
        is_active: bool,
        roles: Vec<Role>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            full_name,
            password_hash,
            is_active,
            roles,
            created_at,
            updated_at,
        }
    }

    pub fn with_roles(mut self, roles: Vec<Role>) -> Self {
        self.roles = roles;
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    // Getters

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    // Mutators

    pub fn set_email(&mut self, email: &str) {
        self.email = normalize_email(email);
        self.touch();
    }

    pub fn set_full_name(&mut self, full_name: impl Into<String>) {
        self.full_name = full_name.into();
        self.touch();
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Emails are compared and stored trimmed and lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults() {
        let user = User::new("  Test@Google.COM ", "Test One", "hash");

        assert_eq!(user.email(), "test@google.com");
        assert!(user.is_active());
        assert_eq!(user.roles(), &[Role::User]);
        assert!(user.has_role(Role::User));
        assert!(!user.has_role(Role::Admin));
    }

    #[test]
    fn test_set_email_normalizes() {
        let mut user = User::new("a@b.com", "A", "hash");
        user.set_email(" NEW@Mail.com");
        assert_eq!(user.email(), "new@mail.com");
    }

    #[test]
    fn test_role_round_trip_names() {
        assert_eq!("super-user".parse::<Role>().unwrap(), Role::SuperUser);
        assert_eq!(Role::Admin.as_str(), "admin");
        assert!("root".parse::<Role>().is_err());

        let json = serde_json::to_string(&Role::SuperUser).unwrap();
        assert_eq!(json, "\"super-user\"");
    }

    #[test]
    fn test_user_id_parse() {
        let id = UserId::generate();
        assert_eq!(UserId::parse(&id.to_string()).unwrap(), id);
        assert!(UserId::parse("not-a-uuid").is_err());
    }

    #[test]
    fn test_user_serialization_excludes_password() {
        let user = User::new("a@b.com", "A", "super_secret_hash");

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("super_secret_hash"));
        assert!(!json.contains("password_hash"));
    }

    #[test]
    fn test_deactivate() {
        let mut user = User::new("a@b.com", "A", "hash");
        let before = user.updated_at();

        std::thread::sleep(std::time::Duration::from_millis(5));
        user.deactivate();

        assert!(!user.is_active());
        assert!(user.updated_at() > before);
    }
}

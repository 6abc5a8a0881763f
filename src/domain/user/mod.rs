//! User domain
//!
//! Domain types and traits for user authentication: the user entity, role
//! tags, input validation and the repository trait.

mod entity;
mod repository;
mod validation;

pub use entity::{normalize_email, Role, User, UserId};
pub use repository::UserRepository;
pub use validation::{validate_email, validate_full_name, validate_password, UserValidationError};

#[cfg(test)]
pub use repository::MockUserRepository;

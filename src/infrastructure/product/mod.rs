//! Product infrastructure module
//!
//! PostgreSQL and in-memory product repositories with their units of work,
//! and the product service.

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::{PostgresProductRepository, PostgresProductUnitOfWork};
pub use repository::{InMemoryProductRepository, InMemoryProductUnitOfWork};
pub use service::{ProductService, UNEXPECTED_ERROR_MESSAGE};

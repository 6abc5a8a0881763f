//! Product repository and unit-of-work traits

use async_trait::async_trait;
use std::fmt::Debug;

#[cfg(test)]
use mockall::automock;

use super::entity::{Product, ProductId, ProductImage};
use crate::domain::pagination::Pagination;
use crate::domain::DomainError;

/// Repository trait for product storage.
///
/// Products are always returned with their images loaded.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync + Debug {
    /// Get a product by id
    async fn get(&self, id: &ProductId) -> Result<Option<Product>, DomainError>;

    /// First product whose uppercased title equals `title` or whose slug
    /// equals `slug`, oldest first
    async fn find_by_title_or_slug(
        &self,
        title: &str,
        slug: &str,
    ) -> Result<Option<Product>, DomainError>;

    /// List a page of products, oldest first
    async fn list(&self, page: Pagination) -> Result<Vec<Product>, DomainError>;

    /// Insert a product and its images atomically
    async fn create(&self, product: Product) -> Result<Product, DomainError>;

    /// Delete a product and its images. Returns false if it did not exist.
    async fn delete(&self, id: &ProductId) -> Result<bool, DomainError>;

    /// Delete every product and image, returning the number of products removed
    async fn delete_all(&self) -> Result<u64, DomainError>;

    /// Open a unit of work for a multi-step update
    async fn begin(&self) -> Result<Box<dyn ProductUnitOfWork>, DomainError>;
}

/// A single transaction over products and their images.
///
/// Nothing done through a unit of work is visible to other readers until
/// `commit`. Dropping it without committing discards the work.
#[async_trait]
pub trait ProductUnitOfWork: Send {
    /// Remove every image attached to the product
    async fn delete_images(&mut self, id: &ProductId) -> Result<(), DomainError>;

    /// Write the product's scalar fields and owner. Missing rows are `NotFound`.
    async fn save_product(&mut self, product: &Product) -> Result<(), DomainError>;

    /// Attach images to the product
    async fn insert_images(
        &mut self,
        id: &ProductId,
        images: &[ProductImage],
    ) -> Result<(), DomainError>;

    async fn commit(self: Box<Self>) -> Result<(), DomainError>;

    async fn rollback(self: Box<Self>) -> Result<(), DomainError>;
}

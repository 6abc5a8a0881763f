//! Product domain
//!
//! The product entity with its images, slug derivation, lookup term
//! classification and the storage traits.

mod entity;
mod lookup;
mod repository;
mod slug;

pub use entity::{
    Gender, PlainProduct, Product, ProductDraft, ProductId, ProductImage, ProductImageId,
    ProductOwner, ProductPatch,
};
pub use lookup::LookupTerm;
pub use repository::{ProductRepository, ProductUnitOfWork};
pub use slug::slugify;

#[cfg(test)]
pub use repository::MockProductRepository;

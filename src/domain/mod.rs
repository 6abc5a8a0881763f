//! Domain layer - Core business logic and entities

pub mod access;
pub mod error;
pub mod pagination;
pub mod product;
pub mod user;

pub use access::{authorize, AccessDenied};
pub use error::DomainError;
pub use pagination::Pagination;
pub use product::{
    Gender, LookupTerm, PlainProduct, Product, ProductDraft, ProductId, ProductImage,
    ProductOwner, ProductPatch, ProductRepository, ProductUnitOfWork,
};
pub use user::{Role, User, UserId, UserRepository};

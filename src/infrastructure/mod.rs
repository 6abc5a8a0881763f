//! Infrastructure layer - storage, security and service implementations

pub mod auth;
pub mod logging;
pub mod observability;
pub mod product;
pub mod seed;
pub mod storage;
pub mod user;

//! Authentication infrastructure module
//!
//! HS256 JWT issuance and validation for user sessions.

mod jwt;

pub use jwt::{IssuedToken, JwtClaims, JwtConfig, JwtGenerator, JwtService};

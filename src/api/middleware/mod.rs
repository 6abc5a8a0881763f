//! API middleware components

pub mod logging;
pub mod metrics;
pub mod security;
pub mod user_auth;

pub use logging::{logging_middleware, redacted_headers};
pub use metrics::metrics_middleware;
pub use security::security_headers_middleware;
pub use user_auth::{
    AdminOnly, AdminOrSuperUser, AnyRole, Auth, RequireUser, RoleRequirement,
};

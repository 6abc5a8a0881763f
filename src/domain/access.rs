//! Role-based access control
//!
//! The gate is a pure function from the caller's role set and the roles an
//! operation declares to an allow/deny decision. It knows nothing about
//! tokens or HTTP; the API layer resolves the caller first and then asks here.

use thiserror::Error;

use super::user::Role;

/// Why access was denied
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessDenied {
    /// No valid caller identity was presented
    #[error("authentication required")]
    Unauthorized,
    /// Caller is known but holds none of the required roles
    #[error("caller needs one of the roles: [{}]", format_roles(.required))]
    Forbidden { required: Vec<Role> },
}

/// Decide whether a caller may run an operation requiring `required`.
///
/// An empty requirement means authentication alone suffices.
pub fn authorize(caller_roles: Option<&[Role]>, required: &[Role]) -> Result<(), AccessDenied> {
    let roles = caller_roles.ok_or(AccessDenied::Unauthorized)?;

    if required.is_empty() || roles.iter().any(|role| required.contains(role)) {
        return Ok(());
    }

    Err(AccessDenied::Forbidden {
        required: required.to_vec(),
    })
}

pub fn format_roles(roles: &[Role]) -> String {
    roles
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

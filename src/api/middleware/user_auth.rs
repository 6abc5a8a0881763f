//! User authentication and role gating using JWT tokens

use std::marker::PhantomData;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::access::{authorize, format_roles, AccessDenied};
use crate::domain::user::{Role, User};

/// Extractor that requires a valid JWT for an existing, active user
///
/// The token is read from `Authorization: Bearer <jwt_token>`.
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_jwt_token(&parts.headers)?;

        debug!("Validating JWT token");

        let claims = state.jwt_service.validate(&token)?;
        let user = state.user_service.get_active(&claims.user_id()?).await?;

        Ok(RequireUser(user))
    }
}

/// Roles an endpoint accepts; a caller needs any one of them
pub trait RoleRequirement: Send + Sync + 'static {
    const ROLES: &'static [Role];
}

/// Any authenticated user
#[derive(Debug)]
pub struct AnyRole;

impl RoleRequirement for AnyRole {
    const ROLES: &'static [Role] = &[];
}

#[derive(Debug)]
pub struct AdminOnly;

impl RoleRequirement for AdminOnly {
    const ROLES: &'static [Role] = &[Role::Admin];
}

#[derive(Debug)]
pub struct AdminOrSuperUser;

impl RoleRequirement for AdminOrSuperUser {
    const ROLES: &'static [Role] = &[Role::SuperUser, Role::Admin];
}

/// Extractor that authenticates the caller and checks `R::ROLES`
#[derive(Debug, Clone)]
pub struct Auth<R: RoleRequirement> {
    pub user: User,
    _requirement: PhantomData<R>,
}

impl<R: RoleRequirement> FromRequestParts<AppState> for Auth<R> {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireUser(user) = RequireUser::from_request_parts(parts, state).await?;

        check_roles(&user, R::ROLES)?;

        Ok(Self {
            user,
            _requirement: PhantomData,
        })
    }
}

/// Run the access gate for a resolved user
pub fn check_roles(user: &User, required: &[Role]) -> Result<(), ApiError> {
    authorize(Some(user.roles()), required).map_err(|denied| match denied {
        AccessDenied::Forbidden { required } => ApiError::forbidden(format!(
            "User {} needs a valid role: [{}]",
            user.full_name(),
            format_roles(&required)
        )),
        AccessDenied::Unauthorized => ApiError::from(denied),
    })
}

/// Extract JWT token from Authorization header
pub fn extract_jwt_token(headers: &HeaderMap) -> Result<String, ApiError> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| ApiError::bad_request("Invalid Authorization header encoding"))?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(token.trim().to_string());
        }
    }

    Err(ApiError::unauthorized(
        "Authentication required. Provide JWT token via 'Authorization: Bearer <token>' header",
    ))
}

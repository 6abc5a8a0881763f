//! Authentication API endpoints
//!
//! Registration, login and token refresh, plus a few gated demo routes that
//! show how the role extractors behave.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use validator::Validate;

use crate::api::middleware::{
    redacted_headers, AdminOnly, AdminOrSuperUser, AnyRole, Auth, RequireUser,
};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, ValidatedJson};
use crate::domain::user::User;
use crate::infrastructure::user::RegisterUserRequest;

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/checkauth", get(check_auth))
        .route("/private", get(private))
        .route("/private2", get(private_for_staff))
        .route("/private3", get(private_for_admins))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "email must be an email"))]
    pub email: String,
    #[validate(length(min = 6, max = 50, message = "password must be 6 to 50 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "fullName must not be empty"))]
    pub full_name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "email must be an email"))]
    pub email: String,
    #[validate(length(min = 6, max = 50, message = "password must be 6 to 50 characters"))]
    pub password: String,
}

/// User fields safe to expose
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
    pub roles: Vec<String>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            email: user.email().to_string(),
            full_name: user.full_name().to_string(),
            is_active: user.is_active(),
            roles: user.roles().iter().map(|r| r.as_str().to_string()).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub token: String,
    pub expires_at: String,
}

fn issue(state: &AppState, user: &User) -> Result<AuthResponse, ApiError> {
    let issued = state.jwt_service.generate(user)?;

    Ok(AuthResponse {
        user: UserResponse::from(user),
        token: issued.token,
        expires_at: issued.expires_at.to_rfc3339(),
    })
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let user = state
        .user_service
        .register(RegisterUserRequest {
            email: request.email,
            password: request.password,
            full_name: request.full_name,
        })
        .await?;

    info!(user_id = %user.id(), "User registered");

    Ok((StatusCode::CREATED, Json(issue(&state, &user)?)))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let user = state
        .user_service
        .authenticate(&request.email, &request.password)
        .await?;

    Ok((StatusCode::CREATED, Json(issue(&state, &user)?)))
}

/// GET /auth/checkauth
///
/// Re-issues a token for a caller whose current token is still valid.
pub async fn check_auth(
    State(state): State<AppState>,
    auth: Auth<AnyRole>,
) -> Result<Json<AuthResponse>, ApiError> {
    Ok(Json(issue(&state, &auth.user)?))
}

pub async fn private(RequireUser(user): RequireUser, headers: HeaderMap) -> Json<Value> {
    Json(json!({
        "ok": true,
        "message": "Private route",
        "user": UserResponse::from(&user),
        "rawHeaders": redacted_headers(&headers),
    }))
}

pub async fn private_for_staff(auth: Auth<AdminOrSuperUser>) -> Json<Value> {
    Json(json!({ "user": UserResponse::from(&auth.user) }))
}

pub async fn private_for_admins(_auth: Auth<AdminOnly>) -> Json<Value> {
    Json(json!({
        "ok": true,
        "message": "private route 3",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::Role;

    #[test]
    fn test_register_request_uses_camel_case() {
        let request: RegisterRequest = serde_json::from_str(
            r#"{"email":"a@b.com","password":"Abc123","fullName":"Test User"}"#,
        )
        .unwrap();

        assert_eq!(request.full_name, "Test User");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_register_request_rejects_bad_email() {
        let request = RegisterRequest {
            email: "not-an-email".to_string(),
            password: "Abc123".to_string(),
            full_name: "Test".to_string(),
        };

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_login_request_short_password() {
        let request = LoginRequest {
            email: "a@b.com".to_string(),
            password: "abc".to_string(),
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn test_user_response_hides_hash() {
        let user = User::new("Test1@Google.com", "Test One", "secret-hash")
            .with_roles(vec![Role::Admin, Role::User]);

        let json = serde_json::to_value(UserResponse::from(&user)).unwrap();

        assert_eq!(json["email"], "test1@google.com");
        assert_eq!(json["fullName"], "Test One");
        assert_eq!(json["isActive"], true);
        assert_eq!(json["roles"], json!(["admin", "user"]));
        assert!(!json.to_string().contains("secret-hash"));
    }
}

//! Authentication middleware for Axum
//!
//! Requests authenticate with `Authorization: Bearer <jwt>` or, for
//! operator tooling, `X-API-Key: <admin key>`. The resolved identity is
//! stored in request extensions as [`AuthenticatedUser`].

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::UserRole;
use crate::infrastructure::crypto::signature::{constant_time_eq, sha256_hex};
use crate::infrastructure::crypto::{verify_token, JwtConfig, TokenClaims};
use crate::interfaces::http::common::ApiResponse;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Authentication error types
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    InvalidApiKey,
    InsufficientPermissions,
}

#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
    /// SHA-256 of the configured admin API key
    pub admin_key_hash: Option<String>,
}

impl AuthState {
    pub fn new(jwt_config: JwtConfig, admin_api_key: Option<&str>) -> Self {
        Self {
            jwt_config,
            admin_key_hash: admin_api_key
                .filter(|k| !k.is_empty())
                .map(sha256_hex),
        }
    }

    fn api_key_matches(&self, presented: &str) -> bool {
        match &self.admin_key_hash {
            Some(expected) => {
                constant_time_eq(expected.as_bytes(), sha256_hex(presented).as_bytes())
            }
            None => false,
        }
    }
}

/// Authenticated caller (either from JWT or API key)
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
    pub role: UserRole,
    pub auth_method: AuthMethod,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthMethod {
    Jwt,
    ApiKey,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: TokenClaims) -> Self {
        Self {
            role: claims.role(),
            user_id: claims.sub,
            email: claims.email,
            auth_method: AuthMethod::Jwt,
        }
    }

    fn api_key() -> Self {
        Self {
            user_id: "api-key".to_string(),
            email: String::new(),
            role: UserRole::Admin,
            auth_method: AuthMethod::ApiKey,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Account id for JWT callers; API-key callers have none.
    pub fn account_id(&self) -> Option<String> {
        (self.auth_method == AuthMethod::Jwt).then(|| self.user_id.clone())
    }
}

fn extract_bearer(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn resolve(state: &AuthState, request: &Request<Body>) -> Result<AuthenticatedUser, AuthError> {
    if let Some(key) = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
    {
        return if state.api_key_matches(key) {
            Ok(AuthenticatedUser::api_key())
        } else {
            Err(AuthError::InvalidApiKey)
        };
    }

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::MissingToken)?;
    let token = extract_bearer(auth_header).ok_or(AuthError::InvalidToken)?;

    verify_token(token, &state.jwt_config)
        .map(AuthenticatedUser::from_claims)
        .map_err(|_| AuthError::InvalidToken)
}

/// Rejects unauthenticated requests with 401
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    match resolve(&auth_state, &request) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => auth_error_response(e),
    }
}

/// Attaches the caller when credentials are valid; never rejects
pub async fn optional_auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if let Ok(user) = resolve(&auth_state, &request) {
        request.extensions_mut().insert(user);
    }
    next.run(request).await
}

/// Must run inside `auth_middleware`; rejects non-admins with 403
pub async fn require_admin(request: Request<Body>, next: Next) -> Response {
    match request.extensions().get::<AuthenticatedUser>() {
        Some(user) if user.is_admin() => next.run(request).await,
        Some(_) => auth_error_response(AuthError::InsufficientPermissions),
        None => auth_error_response(AuthError::MissingToken),
    }
}

fn auth_error_response(error: AuthError) -> Response {
    let (status, message) = match error {
        AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Missing authentication token"),
        AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid or expired token"),
        AuthError::InvalidApiKey => (StatusCode::UNAUTHORIZED, "Invalid API key"),
        AuthError::InsufficientPermissions => (StatusCode::FORBIDDEN, "Admin access required"),
    };

    (status, Json(ApiResponse::<()>::error(message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(extract_bearer("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer("Basic abc"), None);
        assert_eq!(extract_bearer("Bearer "), None);
    }

    #[test]
    fn api_key_compares_hashes() {
        let state = AuthState::new(JwtConfig::default(), Some("tai-loc-admin-key"));
        assert!(state.api_key_matches("tai-loc-admin-key"));
        assert!(!state.api_key_matches("tai-loc-admin-kez"));

        let disabled = AuthState::new(JwtConfig::default(), Some(""));
        assert!(!disabled.api_key_matches(""));
    }
}

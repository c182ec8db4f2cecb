//! Authentication API handlers

use axum::{extract::State, http::StatusCode, Extension};

use super::dto::{LoginRequest, LoginResponse, RegisterRequest, UserInfo};
use crate::interfaces::http::common::{
    created, ok, ApiError, ApiResponse, ApiResult, CreatedResult, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let auth = state.identity.login(&request.email, &request.password).await?;
    ok(LoginResponse {
        token: auth.token,
        token_type: auth.token_type,
        expires_in: auth.expires_in,
        user: auth.user.into(),
    })
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserInfo>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> CreatedResult<UserInfo> {
    let user = state
        .identity
        .register(&request.email, &request.password, &request.name)
        .await?;
    created(user.into())
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserInfo>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> ApiResult<UserInfo> {
    let Some(user_id) = caller.account_id() else {
        return Err(ApiError::new(
            StatusCode::NOT_FOUND,
            "API key callers have no account",
        ));
    };
    ok(state.identity.me(&user_id).await?.into())
}

//! # Auth HTTP Routes
//!
//! Login against the configured user directory, token validation and
//! refresh. Tokens are stateless, so validate and refresh only need the
//! claims already carried by the presented token.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::storefront::StorefrontReader;
use crate::warehouse::WarehouseReader;

use super::extract::{ApiJson, AuthUser};
use super::response::ApiError;
use super::server::AppState;

/// Auth routes under `/api/auth`
pub fn router<W, S>() -> Router<Arc<AppState<W, S>>>
where
    W: WarehouseReader,
    S: StorefrontReader,
{
    Router::new()
        .route("/login", post(login_handler))
        .route("/validate", get(validate_handler))
        .route("/refresh", post(refresh_handler))
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub username: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
    pub expires_in: i64,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub success: bool,
    pub user: UserInfo,
}

// ==================
// Handlers
// ==================

/// Login with a configured username/password pair
async fn login_handler<W, S>(
    State(state): State<Arc<AppState<W, S>>>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError>
where
    W: WarehouseReader,
    S: StorefrontReader,
{
    let user = state.users.verify(&request.username, &request.password)?;
    let token = state.jwt.issue(&user.username, user.role)?;

    Ok(Json(TokenResponse {
        success: true,
        token,
        expires_in: state.jwt.expires_secs(),
        user: UserInfo {
            username: user.username.clone(),
            role: user.role.as_str().to_string(),
        },
    }))
}

/// Echo the claims of a valid token
async fn validate_handler(user: AuthUser) -> Json<ValidateResponse> {
    Json(ValidateResponse {
        success: true,
        user: UserInfo {
            username: user.username,
            role: user.role.as_str().to_string(),
        },
    })
}

/// Issue a fresh token for the holder of a still-valid one
async fn refresh_handler<W, S>(
    State(state): State<Arc<AppState<W, S>>>,
    user: AuthUser,
) -> Result<Json<TokenResponse>, ApiError>
where
    W: WarehouseReader,
    S: StorefrontReader,
{
    let token = state.jwt.issue(&user.username, user.role)?;

    Ok(Json(TokenResponse {
        success: true,
        token,
        expires_in: state.jwt.expires_secs(),
        user: UserInfo {
            username: user.username,
            role: user.role.as_str().to_string(),
        },
    }))
}

//! # Request Extractors
//!
//! The `AuthUser` extractor gates protected endpoints: a bearer JWT is
//! checked first, then `X-API-Key` as the alternate scheme for service
//! callers. Either one present and valid lets the request through.
//! `ApiQuery` and `ApiJson` wrap the stock extractors so that their
//! rejections render through the same error envelope as every other
//! failure instead of axum's plain-text defaults.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::auth::errors::AuthError;
use crate::auth::user::Role;
use crate::storefront::StorefrontReader;
use crate::warehouse::WarehouseReader;

use super::response::ApiError;
use super::server::AppState;

/// The authenticated principal of a request
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
    pub role: Role,
}

#[async_trait]
impl<W, S> FromRequestParts<Arc<AppState<W, S>>> for AuthUser
where
    W: WarehouseReader,
    S: StorefrontReader,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState<W, S>>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(value) = parts.headers.get(AUTHORIZATION) {
            let raw = value.to_str().map_err(|_| AuthError::MalformedToken)?;
            let token = raw.strip_prefix("Bearer ").ok_or(AuthError::MalformedToken)?;
            let claims = state.jwt.validate(token)?;
            let role = claims.role()?;
            return Ok(AuthUser {
                username: claims.sub,
                role,
            });
        }

        if let Some(value) = parts.headers.get("x-api-key") {
            let key = value.to_str().map_err(|_| AuthError::InvalidApiKey)?;
            let service = state.api_keys.validate(key)?;
            return Ok(AuthUser {
                username: service.to_string(),
                role: Role::Api,
            });
        }

        Err(AuthError::MissingCredentials.into())
    }
}

/// Query extractor whose rejection renders the uniform error envelope
#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        Ok(ApiQuery(value))
    }
}

/// JSON body extractor whose rejection renders the uniform error envelope
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(request, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        Ok(ApiJson(value))
    }
}

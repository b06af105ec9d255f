//! # Response Envelope
//!
//! Uniform success and error shapes. Every error in the service funnels
//! through `ApiError`; a response middleware enriches the error body
//! with the request id, timestamp, method and path, and exposes driver
//! detail only in development mode.

use axum::extract::Request;
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::auth::errors::AuthError;
use crate::storefront::StorefrontError;
use crate::warehouse::WarehouseError;

/// Error payload carried on the response for the envelope middleware
#[derive(Debug, Clone)]
pub struct ErrorParts {
    pub status: u16,
    pub error: String,
    pub message: String,
    pub detail: Option<String>,
}

/// The one error type handlers return
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: String,
    message: String,
    detail: Option<String>,
}

impl ApiError {
    pub fn new(status: u16, error: &str, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            error: error.to_string(),
            message: message.into(),
            detail: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(400, "Validation error", message)
    }

    pub fn not_found() -> Self {
        Self::new(404, "Not found", "The requested route does not exist")
    }

    fn with_detail(mut self, detail: Option<String>) -> Self {
        self.detail = detail;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

/// Short classification label for a status code
fn label(status: u16) -> &'static str {
    match status {
        400 => "Validation error",
        401 => "Authentication error",
        403 => "Authorization error",
        404 => "Not found",
        503 => "Service unavailable",
        504 => "Gateway timeout",
        _ => "Internal error",
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        let status = e.status_code();
        Self::new(status, label(status), e.to_string())
    }
}

impl From<WarehouseError> for ApiError {
    fn from(e: WarehouseError) -> Self {
        let status = e.status_code();
        let detail = e.detail();
        Self::new(status, label(status), e.to_string()).with_detail(detail)
    }
}

impl From<StorefrontError> for ApiError {
    fn from(e: StorefrontError) -> Self {
        let status = e.status_code();
        let detail = e.detail();
        Self::new(status, label(status), e.to_string()).with_detail(detail)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(500, "Internal error", "Response serialization failed")
            .with_detail(Some(e.to_string()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let parts = ErrorParts {
            status: self.status.as_u16(),
            error: self.error,
            message: self.message,
            detail: self.detail,
        };

        // Minimal body here; the envelope middleware replaces it with
        // the enriched one carrying request context.
        let body = json!({
            "success": false,
            "error": parts.error,
            "message": parts.message,
            "statusCode": parts.status,
        });

        let mut response = (self.status, Json(body)).into_response();
        response.extensions_mut().insert(parts);
        response
    }
}

/// Fallback for unknown routes
pub async fn not_found_handler() -> ApiError {
    ApiError::not_found()
}

/// Response middleware: attach request context to every error envelope.
///
/// The request id is taken from `x-request-id` when the caller sends
/// one, generated otherwise, and echoed back as a response header on
/// every response.
pub async fn error_envelope(development: bool, request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let mut response = next.run(request).await;

    if let Some(parts) = response.extensions().get::<ErrorParts>().cloned() {
        let mut body = json!({
            "success": false,
            "error": parts.error,
            "message": parts.message,
            "statusCode": parts.status,
            "timestamp": Utc::now().to_rfc3339(),
            "path": path,
            "method": method,
            "requestId": request_id,
        });
        if development {
            if let Some(detail) = parts.detail {
                body["detail"] = serde_json::Value::String(detail);
            }
        }
        let status = response.status();
        response = (status, Json(body)).into_response();
    }

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_errors_map_to_status() {
        let err = ApiError::from(AuthError::MissingCredentials);
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

        let err = ApiError::from(AuthError::Forbidden);
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_database_errors_classify() {
        let err = ApiError::from(WarehouseError::from(sqlx::Error::PoolTimedOut));
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);

        let err = ApiError::from(WarehouseError::UnknownNamedQuery("nope".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_validation_error_carries_message() {
        let err = ApiError::bad_request("The year parameter is required");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "The year parameter is required");
    }
}

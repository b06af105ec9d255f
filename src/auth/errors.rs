//! # Auth Errors
//!
//! Error types for the authentication module.

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication and authorization errors
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// Wrong username or password (generic - don't leak which)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No bearer token or API key on a protected endpoint
    #[error("Authentication required")]
    MissingCredentials,

    /// JWT token has expired
    #[error("Token expired")]
    TokenExpired,

    /// JWT signature is invalid
    #[error("Invalid token signature")]
    InvalidSignature,

    /// JWT token is malformed
    #[error("Malformed token")]
    MalformedToken,

    /// The presented API key is not registered
    #[error("Invalid API key")]
    InvalidApiKey,

    /// Authenticated but not allowed for this resource
    #[error("Not authorized to access this resource")]
    Forbidden,

    /// Unknown role name in a token or user spec
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// The configured user directory is malformed
    #[error("Invalid user spec: {0}")]
    InvalidUserSpec(String),

    /// Password hashing failed
    #[error("Internal error: password hashing failed")]
    HashingFailed,

    /// Token generation failed
    #[error("Internal error: token generation failed")]
    TokenGenerationFailed,
}

impl AuthError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::InvalidCredentials => 401,
            AuthError::MissingCredentials => 401,
            AuthError::TokenExpired => 401,
            AuthError::InvalidSignature => 401,
            AuthError::MalformedToken => 401,
            AuthError::InvalidApiKey => 401,

            AuthError::Forbidden => 403,

            AuthError::UnknownRole(_) => 400,

            AuthError::InvalidUserSpec(_) => 500,
            AuthError::HashingFailed => 500,
            AuthError::TokenGenerationFailed => 500,
        }
    }
}

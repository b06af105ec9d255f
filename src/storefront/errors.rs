//! # Storefront Errors
//!
//! Failures from the WooCommerce database, classified the same way as
//! warehouse errors.

use thiserror::Error;

/// Result type for storefront operations
pub type StorefrontResult<T> = Result<T, StorefrontError>;

/// Errors from the storefront database layer
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Could not reach the database or acquire a connection
    #[error("Storefront database unavailable")]
    Unavailable(#[source] sqlx::Error),

    /// The database did not answer in time
    #[error("Storefront database timeout")]
    Timeout(#[source] sqlx::Error),

    /// Any other driver or query failure
    #[error("Storefront database error")]
    Query(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StorefrontError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Configuration(_) => StorefrontError::Unavailable(e),
            _ => {
                let message = e.to_string().to_lowercase();
                if message.contains("timed out") || message.contains("timeout") {
                    StorefrontError::Timeout(e)
                } else {
                    StorefrontError::Query(e)
                }
            }
        }
    }
}

impl StorefrontError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            StorefrontError::Unavailable(_) => 503,
            StorefrontError::Timeout(_) => 504,
            StorefrontError::Query(_) => 500,
        }
    }

    /// Driver detail for development-mode responses
    pub fn detail(&self) -> Option<String> {
        match self {
            StorefrontError::Unavailable(e)
            | StorefrontError::Timeout(e)
            | StorefrontError::Query(e) => Some(e.to_string()),
        }
    }
}

//! # Warehouse Errors
//!
//! Upstream database failures classified into the status codes the API
//! promises: connection/pool problems map to 503, timeouts to 504 and
//! everything else to a generic 500. Raw driver detail is only exposed
//! in development mode (see the HTTP error formatter).

use thiserror::Error;

/// Result type for warehouse operations
pub type WarehouseResult<T> = Result<T, WarehouseError>;

/// Errors from the warehouse database layer
#[derive(Debug, Error)]
pub enum WarehouseError {
    /// Could not reach the database or acquire a connection
    #[error("Upstream database unavailable")]
    Unavailable(#[source] sqlx::Error),

    /// The database did not answer in time
    #[error("Upstream database timeout")]
    Timeout(#[source] sqlx::Error),

    /// Any other driver or query failure
    #[error("Upstream database error")]
    Query(#[source] sqlx::Error),

    /// A named query that is not on the allow-list
    #[error("Unknown query name: {0}")]
    UnknownNamedQuery(String),

    /// Wrong number of parameters for a named query
    #[error("Query {name} expects {expected} parameter(s), got {got}")]
    BadParamCount {
        name: String,
        expected: usize,
        got: usize,
    },
}

impl From<sqlx::Error> for WarehouseError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Configuration(_) => WarehouseError::Unavailable(e),
            _ => {
                let message = e.to_string().to_lowercase();
                if message.contains("timed out") || message.contains("timeout") {
                    WarehouseError::Timeout(e)
                } else {
                    WarehouseError::Query(e)
                }
            }
        }
    }
}

impl WarehouseError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            WarehouseError::Unavailable(_) => 503,
            WarehouseError::Timeout(_) => 504,
            WarehouseError::Query(_) => 500,
            WarehouseError::UnknownNamedQuery(_) => 400,
            WarehouseError::BadParamCount { .. } => 400,
        }
    }

    /// Driver detail for development-mode responses
    pub fn detail(&self) -> Option<String> {
        match self {
            WarehouseError::Unavailable(e)
            | WarehouseError::Timeout(e)
            | WarehouseError::Query(e) => Some(e.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_map_to_unavailable() {
        let err = WarehouseError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, WarehouseError::Unavailable(_)));
        assert_eq!(err.status_code(), 503);
    }

    #[test]
    fn test_named_query_errors_are_client_errors() {
        assert_eq!(
            WarehouseError::UnknownNamedQuery("x".into()).status_code(),
            400
        );
        assert_eq!(
            WarehouseError::BadParamCount {
                name: "x".into(),
                expected: 2,
                got: 0
            }
            .status_code(),
            400
        );
    }
}

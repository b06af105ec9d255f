//! Gateway Configuration
//!
//! All settings come from environment variables (a `.env` file is honored
//! via dotenvy in `main`). Database credentials, the JWT secret and the
//! static user/API-key directories are required; everything else has a
//! development-friendly default.

use thiserror::Error;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while reading the environment
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is not set
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A variable is set but cannot be parsed
    #[error("Invalid value for {var}: {reason}")]
    InvalidVar { var: &'static str, reason: String },
}

/// Runtime configuration for the gateway process
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Host to bind to (default: "0.0.0.0")
    pub host: String,

    /// Port to bind to (default: 3000)
    pub port: u16,

    /// CORS allowed origins; empty means permissive (development)
    pub cors_origins: Vec<String>,

    /// Public base URL prefixed onto pagination links when set
    pub public_url: Option<String>,

    /// Connection URL for the warehouse database
    pub warehouse_url: String,

    /// Connection URL for the storefront (WooCommerce) database
    pub storefront_url: String,

    /// Pool size for the warehouse database (default: 10)
    pub warehouse_pool_size: u32,

    /// Pool size for the storefront database (default: 10)
    pub storefront_pool_size: u32,

    /// HMAC secret for JWT signing
    pub jwt_secret: String,

    /// Token lifetime in seconds (default: 3600)
    pub jwt_expires_secs: i64,

    /// Static users as `username:password:role` triples, comma separated
    pub users_spec: String,

    /// API keys as `key:service` pairs, comma separated
    pub api_keys_spec: String,

    /// Fixed year filter for the invoice endpoint; `None` means current year
    pub invoice_year: Option<i32>,

    /// Deployment environment; error detail is exposed only in "development"
    pub environment: String,
}

fn required(var: &'static str) -> ConfigResult<String> {
    std::env::var(var).map_err(|_| ConfigError::MissingVar(var))
}

fn optional(var: &'static str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.is_empty())
}

fn parse_or<T: std::str::FromStr>(var: &'static str, default: T) -> ConfigResult<T>
where
    T::Err: std::fmt::Display,
{
    match optional(var) {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidVar {
            var,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

impl GatewayConfig {
    /// Load the configuration from the process environment
    pub fn from_env() -> ConfigResult<Self> {
        let invoice_year = match optional("INVOICE_YEAR") {
            Some(raw) => Some(raw.parse().map_err(|_| ConfigError::InvalidVar {
                var: "INVOICE_YEAR",
                reason: format!("expected a year, got {raw:?}"),
            })?),
            None => None,
        };

        Ok(Self {
            host: optional("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or("PORT", 3000)?,
            cors_origins: optional("CORS_ORIGINS")
                .map(|raw| raw.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_default(),
            public_url: optional("PUBLIC_URL"),
            warehouse_url: required("WAREHOUSE_DATABASE_URL")?,
            storefront_url: required("STOREFRONT_DATABASE_URL")?,
            warehouse_pool_size: parse_or("WAREHOUSE_POOL_SIZE", 10)?,
            storefront_pool_size: parse_or("STOREFRONT_POOL_SIZE", 10)?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_expires_secs: parse_or("JWT_EXPIRES_IN", 3600)?,
            users_spec: required("GATEWAY_USERS")?,
            api_keys_spec: optional("GATEWAY_API_KEYS").unwrap_or_default(),
            invoice_year,
            environment: optional("APP_ENV").unwrap_or_else(|| "development".to_string()),
        })
    }

    /// Whether internal error detail may be surfaced to clients
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// The socket address string to bind
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

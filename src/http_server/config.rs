//! # HTTP Server Configuration
//!
//! The subset of the gateway configuration the HTTP layer needs, plus
//! CORS assembly.

use tower_http::cors::{Any, CorsLayer};

use crate::config::GatewayConfig;

/// Configuration for the HTTP server
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// CORS allowed origins; empty means permissive (development)
    pub cors_origins: Vec<String>,

    /// Whether error detail may be exposed in responses
    pub development: bool,
}

impl HttpServerConfig {
    pub fn from_gateway(config: &GatewayConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            cors_origins: config.cors_origins.clone(),
            development: config.is_development(),
        }
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Build the CORS layer from the configured origins
    pub fn cors_layer(&self) -> CorsLayer {
        if self.cors_origins.is_empty() {
            // No origins configured: permissive for development
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            use tower_http::cors::AllowOrigin;
            let origins: Vec<_> = self
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = HttpServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            cors_origins: vec![],
            development: true,
        };
        assert_eq!(config.socket_addr(), "127.0.0.1:8080");
    }
}

//! # HTTP Server
//!
//! Main HTTP server combining all endpoint routers.
//!
//! This is the unified entry point for the gateway API. Shared state is
//! generic over the two store readers so that tests can swap in mocks
//! without a database.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth::api_key::ApiKeyDirectory;
use crate::auth::jwt::JwtManager;
use crate::auth::user::UserDirectory;
use crate::config::GatewayConfig;
use crate::reconcile::SyncLog;
use crate::storefront::StorefrontReader;
use crate::warehouse::WarehouseReader;

use super::config::HttpServerConfig;
use super::response::{error_envelope, not_found_handler};
use super::{
    auth_routes, catalog_routes, inventory_routes, invoice_routes, product_routes, sync_routes,
    warranty_routes,
};

/// Shared application state injected into every handler
pub struct AppState<W, S> {
    pub config: GatewayConfig,
    pub jwt: JwtManager,
    pub users: UserDirectory,
    pub api_keys: ApiKeyDirectory,
    pub warehouse: W,
    pub storefront: Arc<S>,
    pub sync_log: SyncLog,
}

/// HTTP server for the gateway API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Build the server from the gateway configuration and shared state
    pub fn new<W, S>(config: GatewayConfig, state: Arc<AppState<W, S>>) -> Self
    where
        W: WarehouseReader,
        S: StorefrontReader,
    {
        let config = HttpServerConfig::from_gateway(&config);
        let router = build_router(&config, state);
        Self { config, router }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(&addr).await?;
        info!("Gateway listening on {addr}");
        info!("Health check: http://{addr}/health");
        axum::serve(listener, self.router).await
    }
}

/// Combine all endpoint routers with CORS, tracing and the error
/// envelope middleware
pub fn build_router<W, S>(config: &HttpServerConfig, state: Arc<AppState<W, S>>) -> Router
where
    W: WarehouseReader,
    S: StorefrontReader,
{
    let development = config.development;

    Router::new()
        // Liveness at root level, no auth, no database access
        .route("/health", get(health_handler))
        .nest("/api/auth", auth_routes::router())
        .nest("/api/inventario", inventory_routes::router())
        .route("/api/facturacion", get(invoice_routes::list_handler))
        .route("/api/garanty-ext-list", get(warranty_routes::list_handler))
        .route("/api/list-motos", get(catalog_routes::list_handler))
        .nest("/api/productos", product_routes::router())
        .route("/api/custom-query", post(product_routes::custom_query_handler))
        .nest("/api/sync", sync_routes::router())
        .fallback(not_found_handler)
        .layer(middleware::from_fn(move |request, next| {
            error_envelope(development, request, next)
        }))
        .layer(config.cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe
async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "nova-gateway",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

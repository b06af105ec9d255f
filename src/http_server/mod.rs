//! # HTTP Server Module
//!
//! The REST surface of the gateway: one router per endpoint family, a
//! shared response envelope, request authentication and the server
//! assembly.

pub mod auth_routes;
pub mod catalog_routes;
pub mod config;
pub mod extract;
pub mod inventory_routes;
pub mod invoice_routes;
pub mod product_routes;
pub mod response;
pub mod server;
pub mod sync_routes;
pub mod warranty_routes;

pub use config::HttpServerConfig;
pub use extract::AuthUser;
pub use response::ApiError;
pub use server::{build_router, AppState, HttpServer};

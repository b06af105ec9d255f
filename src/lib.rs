//! nova-gateway - A stateless REST reporting gateway
//!
//! Translates HTTP requests into parameterized SQL against two external
//! MySQL-protocol stores: a warehouse reporting database and a
//! WordPress/WooCommerce storefront. The gateway owns no durable state;
//! both databases remain the system of record.

pub mod auth;
pub mod config;
pub mod http_server;
pub mod query;
pub mod reconcile;
pub mod storefront;
pub mod warehouse;

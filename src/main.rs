//! Gateway entry point
//!
//! Loads the environment, initializes logging, connects both database
//! pools and starts the HTTP server. All request handling lives in the
//! `http_server` module.

use std::sync::Arc;

use clap::Parser;
use dotenvy::dotenv;
use sqlx::mysql::MySqlPoolOptions;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use nova_gateway::auth::api_key::ApiKeyDirectory;
use nova_gateway::auth::jwt::{JwtConfig, JwtManager};
use nova_gateway::auth::user::UserDirectory;
use nova_gateway::config::GatewayConfig;
use nova_gateway::http_server::server::{AppState, HttpServer};
use nova_gateway::reconcile::SyncLog;
use nova_gateway::storefront::MySqlStorefront;
use nova_gateway::warehouse::MySqlWarehouse;

#[derive(Parser, Debug)]
#[command(name = "nova-gateway", about = "Warehouse/storefront reporting gateway")]
struct Args {
    /// Override the bind host from the environment
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port from the environment
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let mut config = GatewayConfig::from_env()?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    info!("Connecting to warehouse database...");
    let warehouse_pool = MySqlPoolOptions::new()
        .max_connections(config.warehouse_pool_size)
        .connect(&config.warehouse_url)
        .await?;

    info!("Connecting to storefront database...");
    let storefront_pool = MySqlPoolOptions::new()
        .max_connections(config.storefront_pool_size)
        .connect(&config.storefront_url)
        .await?;

    let users = UserDirectory::from_spec(&config.users_spec)?;
    let api_keys = ApiKeyDirectory::from_spec(&config.api_keys_spec);
    let jwt = JwtManager::new(JwtConfig {
        secret: config.jwt_secret.clone(),
        expires_secs: config.jwt_expires_secs,
    });

    let state = Arc::new(AppState {
        config: config.clone(),
        jwt,
        users,
        api_keys,
        warehouse: MySqlWarehouse::new(warehouse_pool),
        storefront: Arc::new(MySqlStorefront::new(storefront_pool)),
        sync_log: SyncLog::new(),
    });

    HttpServer::new(config, state).start().await?;

    Ok(())
}

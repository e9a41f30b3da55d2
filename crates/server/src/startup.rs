use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use tracing::info;

use common::utils::logging::init_logging_default;
use configs::AppConfig;
use models::store::Store;
use service::order::repository::MongoOrderRepository;
use service::order::service::OrderService;
use service::product::repository::MongoProductRepository;
use service::product::service::ProductService;

use crate::errors::StartupError;
use crate::routes::{self, ServerState};

/// Public entry: load config, connect to the store, build the app and run
/// the HTTP server. A store that cannot be reached within the startup
/// timeout is fatal.
pub async fn run() -> Result<(), StartupError> {
    dotenv().ok();
    init_logging_default();

    let cfg = AppConfig::load().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;

    let store = Store::connect(&cfg.database).await?;
    store.ensure_indexes().await?;

    let products_repo = Arc::new(MongoProductRepository::new(store.clone()));
    let orders_repo = Arc::new(MongoOrderRepository::new(store));
    let state = ServerState {
        products: Arc::new(ProductService::new(products_repo.clone())),
        orders: Arc::new(OrderService::new(orders_repo, products_repo)),
    };

    let app = routes::build_router(state);
    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e: std::net::AddrParseError| StartupError::InvalidConfig(e.to_string()))?;
    info!(%addr, "starting http server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

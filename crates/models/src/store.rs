use std::time::Duration;

use configs::DatabaseConfig;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use thiserror::Error;
use tracing::info;

use crate::order::Order;
use crate::product::Product;

pub const PRODUCTS: &str = "products";
pub const ORDERS: &str = "orders";

/// Startup-time connection failure. Fatal: the process does not start.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("invalid connection string: {0}")]
    InvalidUri(String),
    #[error("store unreachable: {0}")]
    Unreachable(String),
}

/// Handle to the document store. Cheap to clone (the driver pools
/// connections internally) and passed down explicitly instead of living in
/// a process-wide global.
#[derive(Clone)]
pub struct Store {
    db: Database,
}

impl Store {
    /// Establish the connection, bounded by the configured timeout. The
    /// driver connects lazily, so a `ping` forces an unreachable store to
    /// fail here rather than on the first request.
    pub async fn connect(cfg: &DatabaseConfig) -> Result<Self, ConnectionError> {
        let mut opts = ClientOptions::parse(&cfg.url)
            .await
            .map_err(|e| ConnectionError::InvalidUri(e.to_string()))?;
        opts.app_name = Some("ecommerce-api".to_string());
        opts.server_selection_timeout = Some(Duration::from_secs(cfg.connect_timeout_secs));
        opts.connect_timeout = Some(Duration::from_secs(cfg.connect_timeout_secs));

        let client = Client::with_options(opts)
            .map_err(|e| ConnectionError::InvalidUri(e.to_string()))?;
        let db = client.database(&cfg.name);
        db.run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| ConnectionError::Unreachable(e.to_string()))?;
        info!(database = %cfg.name, "connected to document store");
        Ok(Self { db })
    }

    pub fn products(&self) -> Collection<Product> {
        self.db.collection(PRODUCTS)
    }

    pub fn orders(&self) -> Collection<Order> {
        self.db.collection(ORDERS)
    }

    /// Create the secondary indexes. Index creation is idempotent, so this
    /// runs on every startup.
    pub async fn ensure_indexes(&self) -> Result<(), ConnectionError> {
        let product_indexes = vec![
            IndexModel::builder().keys(doc! { "name": "text" }).build(),
            IndexModel::builder().keys(doc! { "size": 1 }).build(),
            IndexModel::builder().keys(doc! { "price": 1 }).build(),
        ];
        self.products()
            .create_indexes(product_indexes)
            .await
            .map_err(|e| ConnectionError::Unreachable(e.to_string()))?;

        let order_indexes = vec![
            IndexModel::builder().keys(doc! { "user_id": 1 }).build(),
            IndexModel::builder().keys(doc! { "products": 1 }).build(),
        ];
        self.orders()
            .create_indexes(order_indexes)
            .await
            .map_err(|e| ConnectionError::Unreachable(e.to_string()))?;

        info!("secondary indexes ensured");
        Ok(())
    }
}

use std::collections::HashSet;
use std::sync::Arc;

use common::pagination::Page;
use tracing::{info, instrument};

use models::order::{NewOrder, Order};

use crate::errors::ServiceError;
use crate::order::repository::OrderRepository;
use crate::product::repository::ProductRepository;

/// Application service for the order resource. Creation is all-or-nothing:
/// every referenced product must exist before anything is written, and a
/// failed check inserts nothing.
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    products: Arc<dyn ProductRepository>,
}

impl OrderService {
    pub fn new(orders: Arc<dyn OrderRepository>, products: Arc<dyn ProductRepository>) -> Self {
        Self { orders, products }
    }

    #[instrument(skip(self, input), fields(user_id = %input.user_id))]
    pub async fn create(&self, input: NewOrder) -> Result<Order, ServiceError> {
        let product_ids = input.validate()?;

        // One existence query over the referenced ids; no insert happens
        // unless all of them resolve. The check and the insert are separate
        // store operations (no transaction) -- products are never deleted in
        // this system, so the window is acceptable.
        let missing = self.products.missing_ids(&product_ids).await?;
        if !missing.is_empty() {
            let mut seen = HashSet::new();
            let missing: Vec<String> = missing
                .into_iter()
                .filter(|id| seen.insert(*id))
                .map(|id| id.to_hex())
                .collect();
            return Err(ServiceError::missing_products(missing));
        }

        let order = self.orders.insert(input.into_order(product_ids)).await?;
        info!(id = ?order.id, "order created");
        Ok(order)
    }

    /// A user with no orders gets an empty sequence, not an error.
    pub async fn list_for_user(&self, user_id: &str, page: Page) -> Result<Vec<Order>, ServiceError> {
        self.orders.find_by_user(user_id, page).await
    }
}

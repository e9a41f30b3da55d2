use async_trait::async_trait;
use common::pagination::Page;
use futures::TryStreamExt;
use mongodb::bson::doc;

use models::order::Order;
use models::store::Store;

use crate::errors::ServiceError;

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist a new order and return it with its generated identifier.
    async fn insert(&self, order: Order) -> Result<Order, ServiceError>;
    /// Paginated scan of a user's orders in stable `_id` order.
    async fn find_by_user(&self, user_id: &str, page: Page) -> Result<Vec<Order>, ServiceError>;
}

/// MongoDB-backed repository over the `orders` collection.
pub struct MongoOrderRepository {
    store: Store,
}

impl MongoOrderRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl OrderRepository for MongoOrderRepository {
    async fn insert(&self, mut order: Order) -> Result<Order, ServiceError> {
        let result = self
            .store
            .orders()
            .insert_one(&order)
            .await
            .map_err(|e| ServiceError::Unavailable(e.to_string()))?;
        order.id = result.inserted_id.as_object_id();
        Ok(order)
    }

    async fn find_by_user(&self, user_id: &str, page: Page) -> Result<Vec<Order>, ServiceError> {
        let cursor = self
            .store
            .orders()
            .find(doc! { "user_id": user_id })
            .sort(doc! { "_id": 1 })
            .skip(page.offset)
            .limit(page.limit)
            .await
            .map_err(|e| ServiceError::Unavailable(e.to_string()))?;
        cursor
            .try_collect()
            .await
            .map_err(|e| ServiceError::Unavailable(e.to_string()))
    }
}

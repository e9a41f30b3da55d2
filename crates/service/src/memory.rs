//! In-memory implementation of both repositories.
//!
//! Mirrors the document store's filter semantics (case-insensitive
//! substring on product name, exact size, skip/limit windows, insertion
//! order) so services and HTTP handlers can be exercised without a running
//! database. Identifiers are generated locally.

use std::sync::Arc;

use async_trait::async_trait;
use common::pagination::Page;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use models::order::Order;
use models::product::{Product, ProductFilter};

use crate::errors::ServiceError;
use crate::order::repository::OrderRepository;
use crate::product::repository::ProductRepository;

#[derive(Clone, Default)]
pub struct MemoryCatalog {
    products: Arc<RwLock<Vec<Product>>>,
    orders: Arc<RwLock<Vec<Order>>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

fn page_slice<T: Clone>(items: &[T], page: Page) -> Vec<T> {
    items
        .iter()
        .skip(page.offset as usize)
        .take(page.limit as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl ProductRepository for MemoryCatalog {
    async fn insert(&self, mut product: Product) -> Result<Product, ServiceError> {
        product.id = Some(ObjectId::new());
        self.products.write().await.push(product.clone());
        Ok(product)
    }

    async fn find(&self, filter: &ProductFilter, page: Page) -> Result<Vec<Product>, ServiceError> {
        let products = self.products.read().await;
        let needle = filter.name.as_deref().map(str::to_lowercase);
        let matched: Vec<Product> = products
            .iter()
            .filter(|p| {
                let name_ok = needle
                    .as_deref()
                    .map_or(true, |n| p.name.to_lowercase().contains(n));
                let size_ok = filter.size.as_deref().map_or(true, |s| p.size == s);
                name_ok && size_ok
            })
            .cloned()
            .collect();
        Ok(page_slice(&matched, page))
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Product>, ServiceError> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.id == Some(id)).cloned())
    }

    async fn missing_ids(&self, ids: &[ObjectId]) -> Result<Vec<ObjectId>, ServiceError> {
        let products = self.products.read().await;
        Ok(ids
            .iter()
            .copied()
            .filter(|id| !products.iter().any(|p| p.id == Some(*id)))
            .collect())
    }
}

#[async_trait]
impl OrderRepository for MemoryCatalog {
    async fn insert(&self, mut order: Order) -> Result<Order, ServiceError> {
        order.id = Some(ObjectId::new());
        self.orders.write().await.push(order.clone());
        Ok(order)
    }

    async fn find_by_user(&self, user_id: &str, page: Page) -> Result<Vec<Order>, ServiceError> {
        let orders = self.orders.read().await;
        let matched: Vec<Order> = orders
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        Ok(page_slice(&matched, page))
    }
}

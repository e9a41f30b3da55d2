use std::sync::Arc;

use common::pagination::Page;
use mongodb::bson::oid::ObjectId;
use tracing::{info, instrument};

use models::product::{NewProduct, Product, ProductFilter};

use crate::errors::ServiceError;
use crate::product::repository::ProductRepository;

/// Application service for the product resource: boundary validation plus
/// pass-through queries against the repository.
pub struct ProductService {
    repo: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: NewProduct) -> Result<Product, ServiceError> {
        input.validate()?;
        let product = self.repo.insert(input.into_product()).await?;
        info!(id = ?product.id, "product created");
        Ok(product)
    }

    pub async fn list(&self, filter: ProductFilter, page: Page) -> Result<Vec<Product>, ServiceError> {
        self.repo.find(&filter, page).await
    }

    pub async fn get(&self, id: ObjectId) -> Result<Option<Product>, ServiceError> {
        self.repo.find_by_id(id).await
    }
}

use async_trait::async_trait;
use common::pagination::Page;
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Document};

use models::product::{Product, ProductFilter};
use models::store::Store;

use crate::errors::ServiceError;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Persist a new product and return it with its generated identifier.
    async fn insert(&self, product: Product) -> Result<Product, ServiceError>;
    /// Filtered, paginated scan in stable `_id` order.
    async fn find(&self, filter: &ProductFilter, page: Page) -> Result<Vec<Product>, ServiceError>;
    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Product>, ServiceError>;
    /// The subset of `ids` with no matching product document.
    async fn missing_ids(&self, ids: &[ObjectId]) -> Result<Vec<ObjectId>, ServiceError>;
}

/// MongoDB-backed repository. Filters and pagination are pushed down to the
/// store; nothing is post-filtered in process.
pub struct MongoProductRepository {
    store: Store,
}

impl MongoProductRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

pub(crate) fn filter_document(filter: &ProductFilter) -> Document {
    let mut document = Document::new();
    if let Some(name) = filter.name.as_deref() {
        // Case-insensitive substring match; escape so the input is matched
        // literally rather than as a pattern.
        document.insert("name", doc! { "$regex": regex::escape(name), "$options": "i" });
    }
    if let Some(size) = filter.size.as_deref() {
        document.insert("size", size);
    }
    document
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    async fn insert(&self, mut product: Product) -> Result<Product, ServiceError> {
        let result = self
            .store
            .products()
            .insert_one(&product)
            .await
            .map_err(|e| ServiceError::Unavailable(e.to_string()))?;
        product.id = result.inserted_id.as_object_id();
        Ok(product)
    }

    async fn find(&self, filter: &ProductFilter, page: Page) -> Result<Vec<Product>, ServiceError> {
        let cursor = self
            .store
            .products()
            .find(filter_document(filter))
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

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Product>, ServiceError> {
        self.store
            .products()
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| ServiceError::Unavailable(e.to_string()))
    }

    async fn missing_ids(&self, ids: &[ObjectId]) -> Result<Vec<ObjectId>, ServiceError> {
        let found = self
            .store
            .products()
            .distinct("_id", doc! { "_id": { "$in": ids.to_vec() } })
            .await
            .map_err(|e| ServiceError::Unavailable(e.to_string()))?;
        let found: std::collections::HashSet<ObjectId> =
            found.into_iter().filter_map(|b| b.as_object_id()).collect();
        Ok(ids.iter().copied().filter(|id| !found.contains(id)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_matches_everything() {
        assert!(filter_document(&ProductFilter::default()).is_empty());
    }

    #[test]
    fn name_filter_is_escaped_and_case_insensitive() {
        let filter = ProductFilter { name: Some("c++ (pro)".into()), size: None };
        let document = filter_document(&filter);
        let name = document.get_document("name").unwrap();
        assert_eq!(name.get_str("$options").unwrap(), "i");
        let pattern = name.get_str("$regex").unwrap();
        assert!(pattern.contains(r"\+\+"));
        assert!(pattern.contains(r"\("));
    }

    #[test]
    fn filters_are_anded() {
        let filter = ProductFilter { name: Some("phone".into()), size: Some("large".into()) };
        let document = filter_document(&filter);
        assert!(document.contains_key("name"));
        assert_eq!(document.get_str("size").unwrap(), "large");
    }
}

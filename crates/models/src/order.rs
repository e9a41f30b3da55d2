use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::errors::{FieldError, ValidationError};

/// An order placed by a user. Holds weak references to products (by
/// identifier only); referenced products are checked once at creation time
/// and never again.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Caller-supplied, not checked against any user registry.
    pub user_id: String,
    pub products: Vec<ObjectId>,
    /// Caller-supplied and not recomputed from product prices. Known gap,
    /// kept deliberately.
    pub total: f64,
    /// Persisted as a native BSON datetime so date-range queries and
    /// tooling see a date, not text.
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

/// Creation input; product ids arrive as hex strings on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub user_id: String,
    pub products: Vec<String>,
    pub total: f64,
}

impl NewOrder {
    /// Check every constraint and report all offending fields at once.
    /// Returns the parsed product identifiers on success so callers never
    /// re-parse the hex strings.
    pub fn validate(&self) -> Result<Vec<ObjectId>, ValidationError> {
        let mut fields = Vec::new();
        if self.user_id.trim().is_empty() {
            fields.push(FieldError::new("user_id", "must not be empty"));
        }
        if self.products.is_empty() {
            fields.push(FieldError::new("products", "must reference at least one product"));
        }
        let mut ids = Vec::with_capacity(self.products.len());
        for raw in &self.products {
            match ObjectId::parse_str(raw) {
                Ok(id) => ids.push(id),
                Err(_) => fields.push(FieldError::new("products", format!("malformed product id: {raw}"))),
            }
        }
        if !self.total.is_finite() || self.total < 0.0 {
            fields.push(FieldError::new("total", "must be a non-negative number"));
        }
        if fields.is_empty() {
            Ok(ids)
        } else {
            Err(ValidationError { fields })
        }
    }

    pub fn into_order(self, products: Vec<ObjectId>) -> Order {
        Order {
            id: None,
            user_id: self.user_id,
            products,
            total: self.total,
            created_at: Utc::now(),
        }
    }
}

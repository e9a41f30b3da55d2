use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::errors::{FieldError, ValidationError};

/// A catalog product. Created once, never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Store-generated identifier; `None` only before the first insert.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub description: String,
    pub price: f64,
    /// Open set of size labels, exact-matched by the list filter.
    pub size: String,
}

/// Creation input: everything except the identifier, which the store assigns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub size: String,
}

impl NewProduct {
    /// Check every constraint and report all offending fields at once.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut fields = Vec::new();
        if self.name.trim().is_empty() {
            fields.push(FieldError::new("name", "must not be empty"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            fields.push(FieldError::new("price", "must be a non-negative number"));
        }
        if self.size.trim().is_empty() {
            fields.push(FieldError::new("size", "must not be empty"));
        }
        if fields.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { fields })
        }
    }

    pub fn into_product(self) -> Product {
        Product {
            id: None,
            name: self.name,
            description: self.description,
            price: self.price,
            size: self.size,
        }
    }
}

/// List-query filter; both criteria are ANDed when present.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring match on the product name.
    pub name: Option<String>,
    /// Exact match on the size label.
    pub size: Option<String>,
}

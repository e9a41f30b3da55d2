use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use tracing::info;

use common::pagination::Page;
use models::product::{NewProduct, Product, ProductFilter};

use crate::errors::JsonApiError;
use crate::routes::ServerState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub name: Option<String>,
    pub size: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<u64>,
}

/// Wire form of a product; `_id` rendered as a hex string.
#[derive(Debug, Serialize)]
pub struct ProductBody {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub size: String,
}

impl From<Product> for ProductBody {
    fn from(p: Product) -> Self {
        Self {
            id: p.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: p.name,
            description: p.description,
            price: p.price,
            size: p.size,
        }
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<NewProduct>,
) -> Result<(StatusCode, Json<ProductBody>), JsonApiError> {
    let product = state.products.create(input).await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<ProductBody>>, JsonApiError> {
    let filter = ProductFilter { name: q.name, size: q.size };
    let page = Page::from_query(q.limit, q.offset);
    let products = state.products.list(filter, page).await?;
    info!(count = products.len(), "list products");
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ProductBody>, JsonApiError> {
    let oid = ObjectId::parse_str(&id).map_err(|_| {
        JsonApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Validation Error",
            Some(format!("malformed product id: {id}")),
        )
    })?;
    match state.products.get(oid).await? {
        Some(product) => Ok(Json(product.into())),
        None => Err(JsonApiError::new(
            StatusCode::NOT_FOUND,
            "Not Found",
            Some(format!("product not found: {id}")),
        )),
    }
}

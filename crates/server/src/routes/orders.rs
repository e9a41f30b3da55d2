use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use common::pagination::Page;
use models::order::{NewOrder, Order};

use crate::errors::JsonApiError;
use crate::routes::ServerState;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<u64>,
}

/// Wire form of an order; identifiers rendered as hex strings.
#[derive(Debug, Serialize)]
pub struct OrderBody {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub products: Vec<String>,
    pub total: f64,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderBody {
    fn from(o: Order) -> Self {
        Self {
            id: o.id.map(|id| id.to_hex()).unwrap_or_default(),
            user_id: o.user_id,
            products: o.products.iter().map(|id| id.to_hex()).collect(),
            total: o.total,
            created_at: o.created_at,
        }
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<NewOrder>,
) -> Result<(StatusCode, Json<OrderBody>), JsonApiError> {
    let order = state.orders.create(input).await?;
    Ok((StatusCode::CREATED, Json(order.into())))
}

pub async fn list_for_user(
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
    Query(q): Query<PageQuery>,
) -> Result<Json<Vec<OrderBody>>, JsonApiError> {
    let page = Page::from_query(q.limit, q.offset);
    let orders = state.orders.list_for_user(&user_id, page).await?;
    info!(%user_id, count = orders.len(), "list orders");
    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

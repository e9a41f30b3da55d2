use axum::Json;

use common::types::Health;

pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        service: "ecommerce-api",
        version: env!("CARGO_PKG_VERSION"),
    })
}

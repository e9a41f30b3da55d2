pub mod orders;
pub mod products;
pub mod system;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::Level;

use service::order::service::OrderService;
use service::product::service::ProductService;

/// Shared handler state: the two resource services.
#[derive(Clone)]
pub struct ServerState {
    pub products: Arc<ProductService>,
    pub orders: Arc<OrderService>,
}

/// Build the full application router.
pub fn build_router(state: ServerState) -> Router {
    Router::new()
        .route("/", get(system::health))
        .route("/health", get(system::health))
        .route("/products", get(products::list).post(products::create))
        .route("/products/:id", get(products::get))
        .route("/orders", axum::routing::post(orders::create))
        .route("/orders/:user_id", get(orders::list_for_user))
        .with_state(state)
        .layer(CorsLayer::very_permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use common::pagination::Page;
use models::order::Order;
use models::product::{Product, ProductFilter};
use server::routes::{self, ServerState};
use service::errors::ServiceError;
use service::memory::MemoryCatalog;
use service::order::repository::OrderRepository;
use service::order::service::OrderService;
use service::product::repository::ProductRepository;
use service::product::service::ProductService;

struct TestApp {
    base_url: String,
}

/// Spin up the real router on an ephemeral port over the given state.
async fn serve(state: ServerState) -> anyhow::Result<TestApp> {
    let app = routes::build_router(state);

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{addr}");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {e}");
        }
    });

    Ok(TestApp { base_url })
}

/// Server backed by the in-memory catalog so no database is needed.
async fn start_server() -> anyhow::Result<TestApp> {
    let catalog = Arc::new(MemoryCatalog::new());
    serve(ServerState {
        products: Arc::new(ProductService::new(catalog.clone())),
        orders: Arc::new(OrderService::new(catalog.clone(), catalog)),
    })
    .await
}

/// Repository whose store is always unreachable.
struct UnreachableStore;

fn store_down() -> ServiceError {
    ServiceError::Unavailable("connection refused".into())
}

#[async_trait]
impl ProductRepository for UnreachableStore {
    async fn insert(&self, _product: Product) -> Result<Product, ServiceError> {
        Err(store_down())
    }

    async fn find(&self, _filter: &ProductFilter, _page: Page) -> Result<Vec<Product>, ServiceError> {
        Err(store_down())
    }

    async fn find_by_id(&self, _id: ObjectId) -> Result<Option<Product>, ServiceError> {
        Err(store_down())
    }

    async fn missing_ids(&self, _ids: &[ObjectId]) -> Result<Vec<ObjectId>, ServiceError> {
        Err(store_down())
    }
}

#[async_trait]
impl OrderRepository for UnreachableStore {
    async fn insert(&self, _order: Order) -> Result<Order, ServiceError> {
        Err(store_down())
    }

    async fn find_by_user(&self, _user_id: &str, _page: Page) -> Result<Vec<Order>, ServiceError> {
        Err(store_down())
    }
}

/// Server whose every store operation fails, for error-path coverage.
async fn start_unreachable_server() -> anyhow::Result<TestApp> {
    let repo = Arc::new(UnreachableStore);
    serve(ServerState {
        products: Arc::new(ProductService::new(repo.clone())),
        orders: Arc::new(OrderService::new(repo.clone(), repo)),
    })
    .await
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

async fn create_product(app: &TestApp, name: &str, size: &str, price: f64) -> anyhow::Result<String> {
    let res = client()
        .post(format!("{}/products", app.base_url))
        .json(&json!({
            "name": name,
            "description": format!("{name} description"),
            "price": price,
            "size": size,
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = res.json::<Value>().await?;
    Ok(body["_id"].as_str().expect("_id string").to_string())
}

#[tokio::test]
async fn health_is_ok() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn created_product_appears_in_name_filtered_list() -> anyhow::Result<()> {
    let app = start_server().await?;

    // The literal example from the API contract.
    let res = client()
        .post(format!("{}/products", app.base_url))
        .json(&json!({
            "name": "iPhone 14",
            "description": "A16",
            "price": 99999,
            "size": "large",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = res.json::<Value>().await?;
    assert_eq!(created["price"], json!(99999.0));
    let id = created["_id"].as_str().expect("_id string");
    assert!(!id.is_empty());

    let res = client()
        .get(format!("{}/products", app.base_url))
        .query(&[("name", "iPhone 14")])
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let listed = res.json::<Vec<Value>>().await?;
    assert!(listed.iter().any(|p| p["_id"] == id));
    Ok(())
}

#[tokio::test]
async fn product_validation_failure_returns_422_with_fields() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client()
        .post(format!("{}/products", app.base_url))
        .json(&json!({
            "name": "",
            "description": "x",
            "price": -1,
            "size": "",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = res.json::<Value>().await?;
    assert_eq!(body["error"], "Validation Error");
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .expect("fields array")
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "price", "size"]);
    Ok(())
}

#[tokio::test]
async fn list_pagination_respects_limit_and_is_repeatable() -> anyhow::Result<()> {
    let app = start_server().await?;
    for i in 0..5 {
        create_product(&app, &format!("item {i}"), "medium", i as f64).await?;
    }

    let url = format!("{}/products", app.base_url);
    let first = client()
        .get(&url)
        .query(&[("limit", "2"), ("offset", "1")])
        .send()
        .await?
        .json::<Vec<Value>>()
        .await?;
    assert_eq!(first.len(), 2);

    // Same window against an unchanged collection returns the same set.
    let second = client()
        .get(&url)
        .query(&[("limit", "2"), ("offset", "1")])
        .send()
        .await?
        .json::<Vec<Value>>()
        .await?;
    assert_eq!(first, second);

    // Out-of-range limit clamps instead of erroring.
    let clamped = client()
        .get(&url)
        .query(&[("limit", "0")])
        .send()
        .await?
        .json::<Vec<Value>>()
        .await?;
    assert_eq!(clamped.len(), 1);
    Ok(())
}

#[tokio::test]
async fn size_filter_is_exact_and_anded_with_name() -> anyhow::Result<()> {
    let app = start_server().await?;
    create_product(&app, "Shirt", "small", 5.0).await?;
    create_product(&app, "Shirt", "large", 5.0).await?;
    create_product(&app, "Hat", "large", 5.0).await?;

    let listed = client()
        .get(format!("{}/products", app.base_url))
        .query(&[("name", "shirt"), ("size", "large")])
        .send()
        .await?
        .json::<Vec<Value>>()
        .await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["name"], "Shirt");
    assert_eq!(listed[0]["size"], "large");
    Ok(())
}

#[tokio::test]
async fn get_product_by_id_roundtrip_and_errors() -> anyhow::Result<()> {
    let app = start_server().await?;
    let id = create_product(&app, "Lamp", "small", 12.5).await?;

    let res = client()
        .get(format!("{}/products/{id}", app.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["name"], "Lamp");

    let res = client()
        .get(format!("{}/products/{}", app.base_url, ObjectId::new().to_hex()))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client()
        .get(format!("{}/products/not-an-id", app.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    Ok(())
}

#[tokio::test]
async fn order_roundtrip_for_existing_product() -> anyhow::Result<()> {
    let app = start_server().await?;
    let pid = create_product(&app, "Widget", "small", 10.0).await?;

    let res = client()
        .post(format!("{}/orders", app.base_url))
        .json(&json!({
            "user_id": "user-1",
            "products": [pid.as_str()],
            "total": 10.0,
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let order = res.json::<Value>().await?;
    assert!(!order["_id"].as_str().unwrap().is_empty());
    assert_eq!(order["products"], json!([pid]));

    let listed = client()
        .get(format!("{}/orders/user-1", app.base_url))
        .send()
        .await?
        .json::<Vec<Value>>()
        .await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["total"], json!(10.0));
    Ok(())
}

#[tokio::test]
async fn order_with_unknown_product_is_404_and_not_persisted() -> anyhow::Result<()> {
    let app = start_server().await?;
    let known = create_product(&app, "Widget", "small", 10.0).await?;
    let unknown = ObjectId::new().to_hex();

    let res = client()
        .post(format!("{}/orders", app.base_url))
        .json(&json!({
            "user_id": "user-2",
            "products": [known.as_str(), unknown.as_str()],
            "total": 20.0,
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = res.json::<Value>().await?;
    assert!(body["detail"].as_str().unwrap().contains(&unknown));

    // Nothing was persisted for that user.
    let res = client()
        .get(format!("{}/orders/user-2", app.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.json::<Vec<Value>>().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn order_validation_failure_returns_422() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client()
        .post(format!("{}/orders", app.base_url))
        .json(&json!({
            "user_id": "",
            "products": [],
            "total": -1,
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = res.json::<Value>().await?;
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .expect("fields array")
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["user_id", "products", "total"]);
    Ok(())
}

#[tokio::test]
async fn store_outage_surfaces_as_503_with_envelope() -> anyhow::Result<()> {
    let app = start_unreachable_server().await?;

    let res = client().get(format!("{}/products", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = res.json::<Value>().await?;
    assert_eq!(body["error"], "Store Unavailable");
    assert!(body["detail"].as_str().unwrap().contains("connection refused"));

    let res = client()
        .post(format!("{}/products", app.base_url))
        .json(&json!({
            "name": "Widget",
            "description": "x",
            "price": 1.0,
            "size": "small",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    let res = client()
        .get(format!("{}/orders/user-1", app.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(res.json::<Value>().await?["error"], "Store Unavailable");
    Ok(())
}

#[tokio::test]
async fn user_with_no_orders_gets_200_and_empty_array() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client()
        .get(format!("{}/orders/nobody", app.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Vec<Value>>().await?.len(), 0);
    Ok(())
}

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use catalog_console::config::ConsoleConfig;
use catalog_console::gateway::{CatalogGateway, HttpCatalogGateway, RemoteError, RemoteErrorKind};
use catalog_console::model::{ProductDraft, ProductId, SearchCriteria};
use catalog_console::runtime::CatalogConsole;
use catalog_console::session::AlwaysConfirm;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// What the fake catalog service saw.
#[derive(Clone, Default)]
struct MockState {
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
    bodies: Arc<Mutex<Vec<(String, Value)>>>,
    deleted: Arc<Mutex<Vec<String>>>,
}

fn cap_json() -> Value {
    json!({
        "id": 1,
        "name": "Red Cap",
        "price": "9.99",
        "quantity": 5,
        "attributes": {"color": "red"},
        "created_at": "2024-03-01T12:00:00Z",
        "updated_at": "2024-03-02T08:30:00Z"
    })
}

async fn list_products() -> Json<Value> {
    Json(json!([cap_json(), {"id": 2, "name": "Oak Desk", "price": 249.0, "quantity": 2}]))
}

async fn create_product(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    state.bodies.lock().expect("bodies lock").push(("POST".to_owned(), body.clone()));
    let mut created = body;
    created["id"] = json!(7);
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn search_products(
    State(state): State<MockState>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    state.queries.lock().expect("queries lock").push(query);
    Json(json!({"count": 1, "next": null, "previous": null, "results": [cap_json()]}))
}

async fn get_product(Path(id): Path<String>) -> Response {
    match id.as_str() {
        "1" | "007" | "sku/9?v=2" => Json(cap_json()).into_response(),
        "500" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        "garbled" => (StatusCode::OK, "<html>not json</html>").into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response(),
    }
}

async fn update_product(
    State(state): State<MockState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if id == "3" {
        let detail = json!({"price": ["Price must be greater than 0"]});
        return (StatusCode::BAD_REQUEST, Json(detail)).into_response();
    }
    state.bodies.lock().expect("bodies lock").push((format!("PATCH {id}"), body.clone()));
    let mut updated = body;
    updated["id"] = json!(id.parse::<u64>().unwrap_or_default());
    Json(updated).into_response()
}

async fn delete_product(State(state): State<MockState>, Path(id): Path<String>) -> StatusCode {
    state.deleted.lock().expect("deleted lock").push(id);
    StatusCode::NO_CONTENT
}

async fn start_mock_server() -> (HttpCatalogGateway, MockState) {
    let (config, state) = start_mock_service().await;
    let gateway = HttpCatalogGateway::new(&config).expect("build gateway");
    (gateway, state)
}

async fn start_mock_service() -> (ConsoleConfig, MockState) {
    let state = MockState::default();
    let app = Router::new()
        .route("/products/", get(list_products).post(create_product))
        .route("/products/search/", get(search_products))
        .route(
            "/products/{id}/",
            get(get_product).patch(update_product).delete(delete_product),
        )
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock server");
    let addr = listener.local_addr().expect("mock server addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock server");
    });

    (ConsoleConfig::new(format!("http://{addr}/")), state)
}

#[tokio::test]
async fn test_list_all_reads_bare_array() {
    let (gateway, _) = start_mock_server().await;

    let products = gateway.list_all().await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].price, Decimal::new(999, 2));
    assert!(products[0].created_at.is_some());
    assert_eq!(products[1].price, Decimal::new(249, 0));
    assert_eq!(products[1].attributes, json!({}));
}

#[tokio::test]
async fn test_search_sends_criteria_as_query_and_reads_envelope() {
    let (gateway, state) = start_mock_server().await;
    let criteria = SearchCriteria::new()
        .with("name", "cap")
        .with("dimensions.width", "10")
        .with("price_max", "20");

    let products = gateway.search(&criteria).await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Red Cap");

    let queries = state.queries.lock().unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].get("name").map(String::as_str), Some("cap"));
    assert_eq!(queries[0].get("dimensions.width").map(String::as_str), Some("10"));
    assert_eq!(queries[0].get("price_max").map(String::as_str), Some("20"));
}

#[tokio::test]
async fn test_empty_search_hits_search_endpoint() {
    let (gateway, state) = start_mock_server().await;

    gateway.search(&SearchCriteria::new()).await.unwrap();
    let queries = state.queries.lock().unwrap();
    assert_eq!(queries.len(), 1);
    assert!(queries[0].is_empty());
}

#[tokio::test]
async fn test_create_posts_draft_with_numeric_price() {
    let (gateway, state) = start_mock_server().await;
    let draft = ProductDraft::new("Scarf", Decimal::new(1950, 2), 3)
        .with_attributes(json!({"material": {"wool": 80}}));

    let created = gateway.create(&draft).await.unwrap();
    assert_eq!(created.id, ProductId::from(7u64));
    assert_eq!(created.name, "Scarf");

    let bodies = state.bodies.lock().unwrap();
    let (method, body) = &bodies[0];
    assert_eq!(method, "POST");
    assert_eq!(body["price"], json!(19.5));
    assert_eq!(body["quantity"], json!(3));
    assert_eq!(body["attributes"], json!({"material": {"wool": 80}}));
    assert!(body.get("id").is_none());
}

#[tokio::test]
async fn test_update_patches_product_path() {
    let (gateway, state) = start_mock_server().await;
    let draft = ProductDraft::new("Red Cap", Decimal::new(1099, 2), 4);

    let updated = gateway.update(&ProductId::from(1u64), &draft).await.unwrap();
    assert_eq!(updated.quantity, 4);

    let bodies = state.bodies.lock().unwrap();
    assert_eq!(bodies[0].0, "PATCH 1");
}

#[tokio::test]
async fn test_rejected_update_is_client_error() {
    let (gateway, _) = start_mock_server().await;
    let draft = ProductDraft::new("Free", Decimal::ZERO, 1);

    let err = gateway.update(&ProductId::from(3u64), &draft).await.unwrap_err();
    assert_eq!(err.kind(), RemoteErrorKind::Client);
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn test_delete_accepts_no_content() {
    let (gateway, state) = start_mock_server().await;

    gateway.delete(&ProductId::from(5u64)).await.unwrap();
    assert_eq!(*state.deleted.lock().unwrap(), vec!["5".to_owned()]);
}

#[tokio::test]
async fn test_get_maps_statuses() {
    let (gateway, _) = start_mock_server().await;

    let product = gateway.get(&ProductId::from(1u64)).await.unwrap();
    assert_eq!(product.name, "Red Cap");

    let missing = gateway.get(&ProductId::from(404u64)).await.unwrap_err();
    assert_eq!(missing.kind(), RemoteErrorKind::Client);
    assert_eq!(missing.status(), Some(404));

    let broken = gateway.get(&ProductId::from(500u64)).await.unwrap_err();
    assert_eq!(broken.kind(), RemoteErrorKind::Server);
    assert_eq!(broken.status(), Some(500));
}

#[tokio::test]
async fn test_text_ids_reach_the_product_route_intact() {
    let (gateway, _) = start_mock_server().await;

    let padded = gateway.get(&ProductId::from("007")).await.unwrap();
    assert_eq!(padded.name, "Red Cap");

    let reserved = gateway.get(&ProductId::from("sku/9?v=2")).await.unwrap();
    assert_eq!(reserved.name, "Red Cap");

    let stripped = gateway.get(&ProductId::from("7")).await.unwrap_err();
    assert_eq!(stripped.status(), Some(404));
}

#[tokio::test]
async fn test_malformed_body_is_invalid_response() {
    let (gateway, _) = start_mock_server().await;

    let err = gateway.get(&ProductId::from("garbled")).await.unwrap_err();
    assert!(matches!(err, RemoteError::InvalidResponse(_)));
    assert_eq!(err.kind(), RemoteErrorKind::Server);
}

#[tokio::test]
async fn test_unreachable_service_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let gateway = HttpCatalogGateway::new(&ConsoleConfig::new(format!("http://{addr}"))).unwrap();
    let err = gateway.list_all().await.unwrap_err();
    assert_eq!(err.kind(), RemoteErrorKind::Network);
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_console_connects_over_http() {
    let (config, state) = start_mock_service().await;
    let console = CatalogConsole::connect(&config, AlwaysConfirm).expect("connect console");

    console.session.load_all().await.unwrap();
    assert_eq!(console.session.snapshot().await.unwrap().visible_products.len(), 2);

    let outcome = console.session.request_delete(ProductId::from(2u64)).await.unwrap();
    assert_eq!(outcome, catalog_console::session::DeleteOutcome::Deleted);
    assert_eq!(*state.deleted.lock().unwrap(), vec!["2".to_owned()]);

    console.shutdown().await.unwrap();
}

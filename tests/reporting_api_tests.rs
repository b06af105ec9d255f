//! Reporting endpoint tests: auth gating, pagination envelope shape,
//! parameter validation and the error envelope.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use common::{bearer_token, get_request, post_request, send, test_router, test_state, MockStorefront};

#[tokio::test]
async fn test_health_needs_no_auth_and_no_database() {
    let state = test_state(MockStorefront::default());
    let router = test_router(state.clone());

    let (status, body) = send(router, get_request("/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(state.warehouse.hits(), 0);
}

#[tokio::test]
async fn test_unauthenticated_request_never_reaches_database() {
    let state = test_state(MockStorefront::default());
    let router = test_router(state.clone());

    let (status, body) = send(router, get_request("/api/inventario", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["statusCode"], 401);
    assert_eq!(state.warehouse.hits(), 0);
}

#[tokio::test]
async fn test_inventory_envelope_shape() {
    let state = test_state(MockStorefront::default());
    let token = bearer_token(&state);
    let router = test_router(state);

    let request = get_request("/api/inventario?ciudad=AGUACHICA&page=1&limit=50", Some(&token));
    let (status, body) = send(router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 50);
    assert_eq!(body["total"], 2);
    assert_eq!(body["totalPages"], 1);
    assert_eq!(body["hasNext"], false);
    assert_eq!(body["hasPrev"], false);
    assert!(body["next"].is_null());
    assert!(body["prev"].is_null());
    assert_eq!(body["summary"]["total_existencia"], 5.0);
    assert_eq!(body["filters"]["ciudad"], "AGUACHICA");
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_non_numeric_page_falls_back_to_defaults() {
    let state = test_state(MockStorefront::default());
    let token = bearer_token(&state);
    let router = test_router(state);

    let request = get_request("/api/inventario?page=abc&limit=zzz", Some(&token));
    let (status, body) = send(router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 100);
}

#[tokio::test]
async fn test_malformed_json_body_renders_error_envelope() {
    let state = test_state(MockStorefront::default());
    let token = bearer_token(&state);
    let router = test_router(state.clone());

    let request = Request::builder()
        .method("POST")
        .uri("/api/custom-query")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from("{\"name\": not-json"))
        .expect("request");
    let (status, body) = send(router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["statusCode"], 400);
    assert_eq!(body["path"], "/api/custom-query");
    assert_eq!(body["method"], "POST");
    assert!(body["requestId"].as_str().is_some());
    assert_eq!(state.warehouse.hits(), 0);
}

#[tokio::test]
async fn test_non_numeric_history_limit_renders_error_envelope() {
    let state = test_state(MockStorefront::default());
    let token = bearer_token(&state);
    let router = test_router(state);

    let request = get_request("/api/sync/history?limit=abc", Some(&token));
    let (status, body) = send(router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["statusCode"], 400);
    assert!(body["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn test_invoice_summary_and_year_echo() {
    let state = test_state(MockStorefront::default());
    let token = bearer_token(&state);
    let router = test_router(state);

    let request = get_request("/api/facturacion?tienda=AGUACHICA", Some(&token));
    let (status, body) = send(router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["total_con_iva"], 119000.0);
    // the configured fixed year, not the current one
    assert_eq!(body["filters"]["year"], 2025);
}

#[tokio::test]
async fn test_warranty_missing_year_is_400_before_database() {
    let state = test_state(MockStorefront::default());
    let token = bearer_token(&state);
    let router = test_router(state.clone());

    let (status, body) = send(router, get_request("/api/garanty-ext-list", Some(&token))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("year"));
    assert_eq!(state.warehouse.hits(), 0);
}

#[tokio::test]
async fn test_warranty_non_numeric_year_is_400() {
    let state = test_state(MockStorefront::default());
    let token = bearer_token(&state);
    let router = test_router(state);

    let request = get_request("/api/garanty-ext-list?year=abc", Some(&token));
    let (status, body) = send(router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("numeric"));
}

#[tokio::test]
async fn test_warranty_rows_use_clean_field_names() {
    let state = test_state(MockStorefront::default());
    let token = bearer_token(&state);
    let router = test_router(state);

    let request = get_request("/api/garanty-ext-list?year=2025", Some(&token));
    let (status, body) = send(router, request).await;

    assert_eq!(status, StatusCode::OK);
    let row = &body["data"][0];
    assert_eq!(row["marcaDescripcion"], "ZURICH");
    assert_eq!(row["formaPago"], "CONTADO");
    assert_eq!(row["tipoCliente"], "CLIENTE NUEVO");
    // raw warehouse column names must not leak through
    assert!(row.get("des_mar").is_none());
}

#[tokio::test]
async fn test_catalog_carries_computed_prices() {
    let state = test_state(MockStorefront::default());
    let token = bearer_token(&state);
    let router = test_router(state);

    let (status, body) = send(router, get_request("/api/list-motos", Some(&token))).await;

    assert_eq!(status, StatusCode::OK);
    let item = &body["data"][0];
    assert_eq!(item["pre_vta"], 1000.0);
    assert_eq!(item["valor_iva"], 190.0);
    assert_eq!(item["precio_final"], 1190.0);
}

#[tokio::test]
async fn test_con_precios_filters_and_exports() {
    let state = test_state(MockStorefront::default());
    let token = bearer_token(&state);
    let router = test_router(state);

    let request = get_request("/api/productos/con-precios", Some(&token));
    let (status, body) = send(router, request).await;

    assert_eq!(status, StatusCode::OK);
    // MOTO01 survives, MOTO02 rounds to zero stock and stays in,
    // MOTO03 rounds below zero and drops, KIT/01 is a kit component
    assert_eq!(body["count"], 2);
    let item = &body["data"][0];
    assert_eq!(item["codItem"], "MOTO01");
    assert_eq!(item["existencia"], 3);
    assert_eq!(item["precioActual"], 199000);
    assert_eq!(item["precioAnterior"], 210000);
    assert_eq!(body["data"][1]["codItem"], "MOTO02");
    assert_eq!(body["data"][1]["existencia"], 0);
    assert_eq!(
        body["todos_los_cod"],
        "MOTO01:199000:3:210000,MOTO02:199000:0:210000"
    );
}

#[tokio::test]
async fn test_custom_query_allows_only_known_names() {
    let state = test_state(MockStorefront::default());
    let token = bearer_token(&state);

    let router = test_router(state.clone());
    let request = post_request(
        "/api/custom-query",
        Some(&token),
        json!({"name": "inventario_resumen", "params": []}),
    );
    let (status, body) = send(router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["total_items"], 42);

    let router = test_router(state);
    let request = post_request(
        "/api/custom-query",
        Some(&token),
        json!({"name": "DROP TABLE inv_items", "params": []}),
    );
    let (status, body) = send(router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_unknown_route_renders_error_envelope() {
    let state = test_state(MockStorefront::default());
    let router = test_router(state);

    let (status, body) = send(router, get_request("/api/no-such-thing", None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["statusCode"], 404);
    assert_eq!(body["path"], "/api/no-such-thing");
    assert!(body["timestamp"].as_str().is_some());
}

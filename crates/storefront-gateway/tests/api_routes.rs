//! REST routes and request instrumentation, driven in-process.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::NaiveDateTime;
use serde_json::Value;
use tower::ServiceExt;

use storefront_core::metrics::{self, MetricsRegistry};
use storefront_core::model::{NewCustomer, NewOrder, NewOrderItem, NewProduct, OrderStatus};
use storefront_gateway::app_state::AppState;
use storefront_gateway::store::{CustomerStore, MemoryStore, OrderStore, ProductStore};
use storefront_gateway::{config, router};

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
}

async fn fixture() -> (Router, Arc<MetricsRegistry>) {
    let store = Arc::new(MemoryStore::new());

    for (name, category, price, stock) in [
        ("lamp", "home", 3_000, 4),
        ("bulb", "home", 500, 0),
        ("drill", "tools", 9_000, 2),
    ] {
        store
            .insert_product(NewProduct {
                name: name.into(),
                category: category.into(),
                price,
                stock,
            })
            .await
            .unwrap();
    }

    for (first, last, email) in [
        ("Grace", "Hopper", "grace@example.com"),
        ("Alan", "Hopper", "alan@example.com"),
    ] {
        store
            .insert_customer(NewCustomer {
                first_name: first.into(),
                last_name: last.into(),
                email: email.into(),
                phone: None,
                address: "1 Main St".into(),
            })
            .await
            .unwrap();
    }

    for (date, status) in [
        ("2024-01-01T09:00:00", OrderStatus::Pending),
        ("2024-02-01T09:00:00", OrderStatus::Delivered),
        ("2024-03-01T09:00:00", OrderStatus::Processing),
    ] {
        store
            .insert_order(NewOrder {
                customer_id: 1,
                order_date: at(date),
                status,
                items: vec![NewOrderItem { product_id: 1, quantity: 2 }],
            })
            .await
            .unwrap();
    }

    let cfg = config::load_from_str("version: 1\n").unwrap();
    let registry = Arc::new(MetricsRegistry::new());
    let state = AppState::new(cfg, store, Arc::clone(&registry));
    (router::build_router(state), registry)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let resp = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn products_page_records_product_metrics() {
    let (app, registry) = fixture().await;

    let (status, body) = get(&app, "/api/products?page=0&size=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_elements"], 3);
    assert_eq!(body["total_pages"], 2);
    assert_eq!(body["content"][0]["name"], "lamp");

    assert_eq!(registry.counter("products.accessed.total"), 1);
    assert_eq!(registry.gauge("products.page.size"), Some(2.0));
    assert_eq!(registry.distribution("product.search.time").map(|d| d.count), Some(1));
}

#[tokio::test]
async fn product_lookups() {
    let (app, registry) = fixture().await;

    let (status, body) = get(&app, "/api/products/3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "drill");

    let (status, body) = get(&app, "/api/products/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (_, body) = get(&app, "/api/products/available").await;
    let names: Vec<_> = body.as_array().unwrap().iter().map(|p| p["name"].clone()).collect();
    assert_eq!(names, ["drill", "lamp"]);
    assert_eq!(registry.gauge("products.available.count"), Some(2.0));

    let (_, body) = get(&app, "/api/products/category/home").await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = get(&app, "/api/products/low-stock/3").await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn customer_lookups() {
    let (app, _) = fixture().await;

    let (_, body) = get(&app, "/api/customers/search/Hopper").await;
    assert_eq!(body[0]["first_name"], "Alan");
    assert_eq!(body[1]["first_name"], "Grace");

    let (status, body) = get(&app, "/api/customers/email/grace@example.com").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);

    let (status, _) = get(&app, "/api/customers/email/nobody@example.com").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = get(&app, "/api/customers?size=1&page=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"][0]["email"], "alan@example.com");
}

#[tokio::test]
async fn order_queries() {
    let (app, _) = fixture().await;

    let (_, body) = get(&app, "/api/orders").await;
    assert_eq!(body["content"][0]["order_date"], "2024-03-01T09:00:00");
    assert_eq!(body["content"][0]["total_amount"], 6_000);

    let (_, body) = get(&app, "/api/orders/status/pending").await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = get(&app, "/api/orders/status/LOST").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    let (_, body) = get(&app, "/api/orders/needs-attention?cutoff_date=2024-06-01T00:00:00").await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = get(&app, "/api/orders/stale?status=PENDING&before=2024-01-15T00:00:00").await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = get(&app, "/api/orders/customer/1").await;
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (_, body) = get(&app, "/api/orders/2").await;
    assert_eq!(body["status"], "DELIVERED");
    assert_eq!(body["items"][0]["price"], 3_000);
}

#[tokio::test]
async fn oversized_page_is_rejected_without_leaking_a_slot() {
    let (app, registry) = fixture().await;

    let (status, body) = get(&app, "/api/products?size=5000").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    assert_eq!(registry.active_requests(), 0);
    assert_eq!(registry.counter(metrics::REQUESTS_TOTAL), 1);
}

#[tokio::test]
async fn concurrent_requests_balance_out() {
    let (app, registry) = fixture().await;

    let tasks: Vec<_> = (0..100)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                let uri = if i % 2 == 0 { "/api/products" } else { "/api/orders/1" };
                get(&app, uri).await.0
            })
        })
        .collect();
    for t in tasks {
        assert_eq!(t.await.unwrap(), StatusCode::OK);
    }

    assert_eq!(registry.active_requests(), 0);
    assert_eq!(registry.counter(metrics::REQUESTS_TOTAL), 100);
    assert_eq!(
        registry.distribution(metrics::RESPONSE_TIME).map(|d| d.count),
        Some(100)
    );
}

#[tokio::test]
async fn ops_endpoints_are_not_tracked() {
    let (app, _) = fixture().await;

    let _ = get(&app, "/api/products/1").await;
    let _ = get(&app, "/healthz").await;

    let (status, body) = get(&app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["counters"]["system.requests.total"], 1);
    assert_eq!(body["active_requests"], 0);
    assert_eq!(body["distributions"]["system.response.time"]["count"], 1);
    assert!(body["gauges"]["system.memory.usage"].as_f64().unwrap() <= 100.0);
}

#[tokio::test]
async fn malformed_parameters_use_json_errors() {
    let (app, registry) = fixture().await;

    for uri in [
        "/api/products/abc",
        "/api/products?page=-1",
        "/api/orders/needs-attention",
        "/api/orders/stale?status=PENDING&before=yesterday",
    ] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["code"], "BAD_REQUEST", "{uri}");
        assert!(body["msg"].as_str().is_some_and(|m| !m.is_empty()), "{uri}");
    }

    assert_eq!(registry.active_requests(), 0);
}

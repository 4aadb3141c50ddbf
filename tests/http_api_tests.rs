//! HTTP API tests
//!
//! Request-level tests over the full route table: create/list/delete,
//! redirect semantics with access counting, CSV export.

use std::sync::Arc;
use std::sync::Once;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use tempfile::TempDir;

use linkcut::api::routes::{health_routes, links_routes, redirect_routes};
use linkcut::api::services::AppStartTime;
use linkcut::config::init_config;
use linkcut::services::{LinkService, ResolverService};
use linkcut::storage::SeaOrmStore;

// =============================================================================
// Test Setup
// =============================================================================

static INIT: Once = Once::new();

fn init_test_config() {
    INIT.call_once(|| {
        init_config();
    });
}

struct TestContext {
    store: Arc<SeaOrmStore>,
    link_service: Arc<LinkService>,
    resolver: Arc<ResolverService>,
    start_time: AppStartTime,
    _dir: TempDir,
}

async fn create_context() -> TestContext {
    init_test_config();

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("http_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let store = Arc::new(
        SeaOrmStore::new(&db_url, "sqlite")
            .await
            .expect("Failed to create store"),
    );

    TestContext {
        link_service: Arc::new(LinkService::new(store.clone())),
        resolver: Arc::new(ResolverService::new(store.clone())),
        start_time: AppStartTime {
            start_datetime: chrono::Utc::now(),
        },
        store,
        _dir: temp_dir,
    }
}

macro_rules! test_app {
    ($ctx:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($ctx.store.clone()))
                .app_data(web::Data::new($ctx.link_service.clone()))
                .app_data(web::Data::new($ctx.resolver.clone()))
                .app_data(web::Data::new($ctx.start_time.clone()))
                .service(links_routes())
                .service(health_routes())
                .service(redirect_routes()),
        )
        .await
    };
}

// =============================================================================
// Create / List / Delete
// =============================================================================

#[actix_rt::test]
async fn test_create_link_returns_201_with_link() {
    let ctx = create_context().await;
    let app = test_app!(ctx);

    let resp = TestRequest::post()
        .uri("/links")
        .set_json(serde_json::json!({"code": "abc123", "url": "https://example.com"}))
        .send_request(&app)
        .await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["code"], "abc123");
    assert_eq!(body["data"]["original_url"], "https://example.com");
    assert_eq!(body["data"]["access_count"], 0);
    assert!(body["data"]["id"].as_str().is_some_and(|s| !s.is_empty()));
}

#[actix_rt::test]
async fn test_create_duplicate_code_returns_409() {
    let ctx = create_context().await;
    let app = test_app!(ctx);

    let first = TestRequest::post()
        .uri("/links")
        .set_json(serde_json::json!({"code": "dup", "url": "https://example.com"}))
        .send_request(&app)
        .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = TestRequest::post()
        .uri("/links")
        .set_json(serde_json::json!({"code": "dup", "url": "https://example.org"}))
        .send_request(&app)
        .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[actix_rt::test]
async fn test_create_invalid_input_returns_400() {
    let ctx = create_context().await;
    let app = test_app!(ctx);

    let bad_url = TestRequest::post()
        .uri("/links")
        .set_json(serde_json::json!({"code": "okcode", "url": "javascript:alert(1)"}))
        .send_request(&app)
        .await;
    assert_eq!(bad_url.status(), StatusCode::BAD_REQUEST);

    let bad_code = TestRequest::post()
        .uri("/links")
        .set_json(serde_json::json!({"code": "a.b", "url": "https://example.com"}))
        .send_request(&app)
        .await;
    assert_eq!(bad_code.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_list_links_paginated_newest_first() {
    let ctx = create_context().await;
    let app = test_app!(ctx);

    for i in 0..3 {
        let resp = TestRequest::post()
            .uri("/links")
            .set_json(serde_json::json!({
                "code": format!("list-{}", i),
                "url": "https://example.com"
            }))
            .send_request(&app)
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let resp = TestRequest::get()
        .uri("/links?page=1&page_size=2")
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["pagination"]["total_pages"], 2);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"][0]["code"], "list-2");
    assert_eq!(body["data"][1]["code"], "list-1");
}

#[actix_rt::test]
async fn test_delete_link_returns_204_and_is_idempotent() {
    let ctx = create_context().await;
    let app = test_app!(ctx);

    let created = TestRequest::post()
        .uri("/links")
        .set_json(serde_json::json!({"code": "todelete", "url": "https://example.com"}))
        .send_request(&app)
        .await;
    let body: serde_json::Value = test::read_body_json(created).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let first = TestRequest::delete()
        .uri(&format!("/links/{}", id))
        .send_request(&app)
        .await;
    assert_eq!(first.status(), StatusCode::NO_CONTENT);

    let second = TestRequest::delete()
        .uri(&format!("/links/{}", id))
        .send_request(&app)
        .await;
    assert_eq!(second.status(), StatusCode::NO_CONTENT);

    // Former code no longer resolves
    let gone = TestRequest::get().uri("/todelete").send_request(&app).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Redirect
// =============================================================================

#[actix_rt::test]
async fn test_redirect_302_with_no_store_headers() {
    let ctx = create_context().await;
    let app = test_app!(ctx);

    TestRequest::post()
        .uri("/links")
        .set_json(serde_json::json!({"code": "redir", "url": "https://example.com/target"}))
        .send_request(&app)
        .await;

    let resp = TestRequest::get().uri("/redir").send_request(&app).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get("Location").unwrap(),
        "https://example.com/target"
    );
    let cache_control = resp
        .headers()
        .get("Cache-Control")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cache_control.contains("no-store"));
}

#[actix_rt::test]
async fn test_redirect_unknown_code_returns_404() {
    let ctx = create_context().await;
    let app = test_app!(ctx);

    let resp = TestRequest::get().uri("/nothere").send_request(&app).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_redirect_syntactically_invalid_code_returns_404() {
    let ctx = create_context().await;
    let app = test_app!(ctx);

    // Dots are outside the code charset: rejected without a lookup
    let resp = TestRequest::get()
        .uri("/favicon.ico")
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(ctx.resolver.cooldown_entries(), 0);
}

/// The full scenario: two hits within the window count once, a third hit
/// after the window counts again.
#[actix_rt::test]
async fn test_redirect_access_counting_with_cooldown() {
    let ctx = create_context().await;
    let app = test_app!(ctx);

    let created = TestRequest::post()
        .uri("/links")
        .set_json(serde_json::json!({"code": "abc123", "url": "https://example.com"}))
        .send_request(&app)
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let body: serde_json::Value = test::read_body_json(created).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    // Two rapid hits: both redirect, only the first is counted
    for _ in 0..2 {
        let resp = TestRequest::get().uri("/abc123").send_request(&app).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get("Location").unwrap(),
            "https://example.com"
        );
    }
    let link = ctx.store.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(link.access_count, 1);

    // Past the window the next hit is counted
    tokio::time::sleep(Duration::from_millis(1100)).await;
    let resp = TestRequest::get().uri("/abc123").send_request(&app).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let link = ctx.store.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(link.access_count, 2);
}

// =============================================================================
// Counted Metadata Lookup
// =============================================================================

#[actix_rt::test]
async fn test_get_link_by_code_counts_access() {
    let ctx = create_context().await;
    let app = test_app!(ctx);

    TestRequest::post()
        .uri("/links")
        .set_json(serde_json::json!({"code": "spafetch", "url": "https://example.com"}))
        .send_request(&app)
        .await;

    let resp = TestRequest::get()
        .uri("/links/spafetch")
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["original_url"], "https://example.com");
    assert_eq!(body["data"]["access_count"], 1);

    let missing = TestRequest::get()
        .uri("/links/absent")
        .send_request(&app)
        .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// CSV Export
// =============================================================================

#[actix_rt::test]
async fn test_export_csv_with_bom_and_header() {
    let ctx = create_context().await;
    let app = test_app!(ctx);

    TestRequest::post()
        .uri("/links")
        .set_json(serde_json::json!({"code": "csvlink", "url": "https://example.com/a,b"}))
        .send_request(&app)
        .await;

    let resp = TestRequest::get()
        .uri("/links/export/csv")
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.headers()
            .get("Content-Type")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/csv")
    );
    assert!(
        resp.headers()
            .get("Content-Disposition")
            .unwrap()
            .to_str()
            .unwrap()
            .contains("attachment")
    );

    let body = test::read_body(resp).await;
    assert_eq!(&body[..3], &[0xEF, 0xBB, 0xBF]);

    let text = std::str::from_utf8(&body[3..]).unwrap();
    assert!(text.starts_with("id,code,original_url,access_count,created_at"));
    assert!(text.contains("csvlink"));
    // Comma-bearing URL got quoted
    assert!(text.contains("\"https://example.com/a,b\""));
}

// =============================================================================
// Health
// =============================================================================

#[actix_rt::test]
async fn test_healthz_reports_ok() {
    let ctx = create_context().await;
    let app = test_app!(ctx);

    let resp = TestRequest::get().uri("/healthz").send_request(&app).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["storage"]["backend"], "sqlite");
}

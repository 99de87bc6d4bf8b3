mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::test_app;

#[tokio::test]
async fn test_health_check() {
    let app = test_app();
    let (status, body) = app.send("GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "UP");
}

#[tokio::test]
async fn test_homepage_defaults_to_initial_group() {
    let app = test_app();
    let (status, body) = app.send("GET", "/homepage", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Success");
    assert_eq!(body["group"], "initial");
    assert_eq!(body["hasMore"], true);
    assert_eq!(body["nextGroup"], "group1");
    assert_eq!(body["section1"].as_array().unwrap().len(), 7);
    assert!(body["section2"]["ListKorea"].is_array());
    assert!(body.get("section5").is_none());
    assert!(body["seoOnPage"].is_object());
}

#[tokio::test]
async fn test_last_group_has_null_next_group() {
    let app = test_app();
    let (status, body) = app.send("GET", "/homepage/group2", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hasMore"], false);
    assert!(body["nextGroup"].is_null());
    assert_eq!(body["section9"][0]["content"], "Nội dung hoat-hinh-nhat-ban, han-quoc-all-0");
}

#[tokio::test]
async fn test_invalid_group_is_bad_request() {
    let app = test_app();
    let (status, body) = app.send("GET", "/homepage/group3", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "INVALID_GROUP");
    assert!(app.cache.keys_with_prefix("homepage::").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_upstream_outage_is_bad_gateway() {
    let app = test_app();
    app.catalog.set_down(true);

    let (status, body) = app.send("GET", "/fullHomepage", None).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "UPSTREAM_UNAVAILABLE");
}

#[tokio::test]
async fn test_full_homepage_contains_every_section() {
    let app = test_app();
    let (status, body) = app.send("GET", "/fullHomepage", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rawData"]["data"]["items"].as_array().unwrap().len(), 21);
    assert!(body["seoOnPage"].is_object());
    for n in [1, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12] {
        assert!(body[format!("section{}", n)].is_array(), "section{}", n);
    }
    assert_eq!(body["section6"][0]["slug"], "feed-7");
    assert!(body["section6"][0]["content"].is_null());
    assert_eq!(
        body["section6"][0]["optimizedThumb"],
        format!("{}/feed-7-thumb.jpg", common::CDN)
    );
}

#[tokio::test]
async fn test_admin_refresh_and_status() {
    let app = test_app();

    let (status, body) = app.send("POST", "/admin/refresh/new", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["duration_ms"].is_u64());

    let (status, body) = app.send("GET", "/admin/cache/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_keys"], 13);
    assert_eq!(body["keys"]["homepage::section4"]["status"], "CACHED");
    assert_eq!(body["groups"]["group1"]["last_outcome"], "COMMITTED");
}

#[tokio::test]
async fn test_admin_refresh_group_and_section() {
    let app = test_app();

    let (status, _) = app.send("POST", "/admin/refresh/group/Group1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(app.cache.exists("homepage::section8").await.unwrap());

    let (status, _) = app.send("POST", "/admin/refresh/section/section1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(app.cache.exists("homepage::raw").await.unwrap());

    let (status, body) = app.send("POST", "/admin/refresh/section/section99", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_SECTION");
}

#[tokio::test]
async fn test_admin_clear_endpoints() {
    let app = test_app();
    app.send("POST", "/admin/refresh/new", None).await;

    let (status, _) = app.send("DELETE", "/admin/cache/section/section3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!app.cache.exists("homepage::section3").await.unwrap());

    let (status, _) = app.send("DELETE", "/admin/cache/group/group2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!app.cache.exists("homepage::section12").await.unwrap());

    let (status, body) = app.send("DELETE", "/admin/cache/clearAll", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["warning"].is_string());

    let (_, body) = app.send("GET", "/admin/cache/status", None).await;
    assert_eq!(body["total_keys"], 0);
    assert!(body["warning"].is_string());
}

#[tokio::test]
async fn test_schedule_toggle_and_info() {
    let app = test_app();

    let (status, body) = app
        .send("PUT", "/admin/schedule", Some(json!({ "enabled": false })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(!app.state.orchestrator.schedule_enabled());

    let (status, body) = app.send("GET", "/admin/info", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["refresh_schedule"]["enabled"], false);
    assert_eq!(body["groups"].as_array().unwrap().len(), 3);
    assert_eq!(body["cache_ttl_minutes"], 60);
}

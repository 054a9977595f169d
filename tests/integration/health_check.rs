// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::body::Body;
use axum::http::{header, HeaderName, HeaderValue, Method, Request, StatusCode};
use hubsum::presentation::routes;
use tower::util::ServiceExt;

use super::helpers::spawn_app;

/// 健康检查测试
///
/// 验证健康检查端点是否正常工作
#[tokio::test]
async fn health_check_works() {
    let app = routes::routes();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn version_reports_crate_version() {
    let app = spawn_app().await;

    let response = app.server.get("/v1/version").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), env!("CARGO_PKG_VERSION"));
}

/// 允许的来源会得到 CORS 响应头
#[tokio::test]
async fn cors_allows_configured_origins() {
    let app = spawn_app().await;

    for origin in ["https://learn.bcit.ca", "chrome-extension://abcdefghijklmnop"] {
        let response = app
            .server
            .get("/health")
            .add_header(
                HeaderName::from_static("origin"),
                HeaderValue::from_static(origin),
            )
            .await;

        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some(origin)
        );
    }
}

#[tokio::test]
async fn cors_rejects_unknown_origin() {
    let app = spawn_app().await;

    let response = app
        .server
        .get("/health")
        .add_header(
            HeaderName::from_static("origin"),
            HeaderValue::from_static("https://evil.example.com"),
        )
        .await;

    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn cors_preflight_for_text_endpoint() {
    let app = spawn_app().await;

    let response = app
        .server
        .method(Method::OPTIONS, "/summarize-text")
        .add_header(
            HeaderName::from_static("origin"),
            HeaderValue::from_static("https://learn.bcit.ca"),
        )
        .add_header(
            header::ACCESS_CONTROL_REQUEST_METHOD,
            HeaderValue::from_static("POST"),
        )
        .add_header(
            header::ACCESS_CONTROL_REQUEST_HEADERS,
            HeaderValue::from_static("content-type"),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let allowed = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(allowed.contains("POST"));
}

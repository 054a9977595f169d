// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use hubsum::utils::html_sanitizer::{uses_only_allowed_tags, MAX_LIST_ITEMS};
use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use super::helpers::{generate_path, gemini_body, mount_summary, spawn_app, CANNED_SUMMARY};

const LECTURE: &str = "Sorting puts items in order.\n\nMerge sort splits the list in half and merges the sorted halves.\n\nQuick sort partitions around a pivot and recurses.";

fn text_file_form(contents: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(contents.as_bytes().to_vec())
            .file_name("lecture.txt")
            .mime_type("text/plain"),
    )
}

/// 上传三段文本文件，返回提取文本与结构化摘要
#[tokio::test]
async fn upload_text_file_returns_text_and_summary() {
    let app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_string_contains("Quick sort partitions around a pivot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body(CANNED_SUMMARY)))
        .expect(1)
        .mount(&app.backend)
        .await;

    let response = app
        .server
        .post("/buffer-to-file-summary")
        .multipart(text_file_form(LECTURE))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["text"], LECTURE);

    let summary = body["summary"].as_str().unwrap();
    assert!(summary.starts_with("<p><b>TLDR:</b>"));
    assert!(uses_only_allowed_tags(summary));
    let items = summary.matches("<li>").count();
    assert!((1..=MAX_LIST_ITEMS).contains(&items));
}

/// 旧路径与新路径行为一致
#[tokio::test]
async fn legacy_upload_route_is_an_alias() {
    let app = spawn_app().await;
    mount_summary(&app.backend).await;

    let response = app
        .server
        .post("/buffer-to-text")
        .multipart(text_file_form(LECTURE))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["summary"], CANNED_SUMMARY);
}

#[tokio::test]
async fn upload_without_file_is_bad_request() {
    let app = spawn_app().await;
    mount_summary(&app.backend).await;

    let form = MultipartForm::new().add_text("note", "no file here");
    let response = app.server.post("/buffer-to-file-summary").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("File required"));
    assert!(app.backend.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_pdf_is_server_error_without_backend_call() {
    let app = spawn_app().await;
    mount_summary(&app.backend).await;

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(b"%PDF-1.7 this is not really a pdf".to_vec())
            .file_name("broken.pdf")
            .mime_type("application/pdf"),
    );
    let response = app.server.post("/buffer-to-file-summary").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Failed to parse and summarize file"));
    assert!(error.contains("extract"));
    assert!(app.backend.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn summarize_text_returns_summary() {
    let app = spawn_app().await;
    mount_summary(&app.backend).await;

    let response = app
        .server
        .post("/summarize-text")
        .json(&json!({ "text": LECTURE }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["summary"], CANNED_SUMMARY);
}

#[tokio::test]
async fn blank_or_missing_text_is_bad_request() {
    let app = spawn_app().await;
    mount_summary(&app.backend).await;

    for payload in [json!({ "text": "" }), json!({ "text": "   " }), json!({})] {
        let response = app.server.post("/summarize-text").json(&payload).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "Missing 'text' field in request body.");
    }

    assert!(app.backend.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_json_uses_error_envelope() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/summarize-text")
        .content_type("application/json")
        .bytes("{ not json".into())
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn backend_failure_is_server_error() {
    let app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&app.backend)
        .await;

    let response = app
        .server
        .post("/summarize-text")
        .json(&json!({ "text": LECTURE }))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to generate summary"));
}

#[tokio::test]
async fn model_output_is_sanitized() {
    let app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body(
            "```html\n<h2>Overview</h2><ul><li><a href=\"x\">Stacks</a></li></ul><script>x()</script>\n```",
        )))
        .mount(&app.backend)
        .await;

    let response = app
        .server
        .post("/summarize-text")
        .json(&json!({ "text": "Stacks are LIFO." }))
        .await;

    let body: Value = response.json();
    assert_eq!(body["summary"], "<p>Overview</p><ol><li>Stacks</li></ol>");
}

#[tokio::test]
async fn summarize_page_uses_visible_text() {
    let app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .and(body_string_contains("Binary trees have two children"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body(CANNED_SUMMARY)))
        .expect(1)
        .mount(&app.backend)
        .await;

    let html = "<html><head><style>p{}</style></head><body><p>Binary trees have two children.</p><script>track()</script></body></html>";
    let response = app
        .server
        .post("/summarize-page")
        .json(&json!({ "html": html }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);

    let missing = app.server.post("/summarize-page").json(&json!({})).await;
    assert_eq!(missing.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let app = spawn_app().await;
    mount_summary(&app.backend).await;

    let big = "a".repeat(2 * 1024 * 1024);
    let response = app
        .server
        .post("/buffer-to-file-summary")
        .multipart(text_file_form(&big))
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(app.backend.received_requests().await.unwrap().is_empty());
}

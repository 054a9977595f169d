// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use axum_test::TestServer;
use hubsum::application::usecases::ingest_document::IngestDocumentUseCase;
use hubsum::config::settings::{
    CorsSettings, LlmProvider, LlmSettings, MetricsSettings, ServerSettings, Settings,
    UploadSettings,
};
use hubsum::domain::services::llm_service::{LLMService, LLMServiceTrait};
use hubsum::domain::services::summarizer::Summarizer;
use hubsum::presentation::routes;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const MODEL: &str = "gemini-2.5-flash";

/// 后端返回的典型摘要
pub const CANNED_SUMMARY: &str = "<p><b>TLDR:</b> Sorting algorithms trade time for memory.</p>\
<p><b>Here are the main key points:</b></p>\
<ol><li>Merge sort is stable.</li><li>Quick sort is in place.</li><li>Heap sort uses a heap.</li></ol>\
<p>Each algorithm suits different inputs.</p>";

#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub backend: MockServer,
}

pub fn gemini_body(text: &str) -> Value {
    json!({
        "candidates": [
            { "content": { "role": "model", "parts": [ { "text": text } ] } }
        ],
        "usageMetadata": {
            "promptTokenCount": 120,
            "candidatesTokenCount": 60,
            "totalTokenCount": 180
        }
    })
}

pub fn generate_path() -> String {
    format!("/models/{}:generateContent", MODEL)
}

/// 挂载一个总是返回 `CANNED_SUMMARY` 的 Gemini 模拟后端
pub async fn mount_summary(backend: &MockServer) {
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body(CANNED_SUMMARY)))
        .mount(backend)
        .await;
}

pub fn test_settings(api_base_url: String) -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        llm: LlmSettings {
            provider: LlmProvider::Gemini,
            api_key: "test-key".to_string(),
            model: MODEL.to_string(),
            api_base_url,
            temperature: 0.9,
            timeout_secs: 5,
        },
        cors: CorsSettings {
            allowed_origins: vec![
                "https://learn.bcit.ca".to_string(),
                "chrome-extension://*".to_string(),
            ],
        },
        upload: UploadSettings {
            max_file_bytes: 1024 * 1024,
        },
        metrics: MetricsSettings {
            enabled: false,
            listen_addr: "127.0.0.1:0".to_string(),
        },
    }
}

/// 启动指向模拟后端的应用
pub async fn spawn_app() -> TestApp {
    let backend = MockServer::start().await;
    let settings = test_settings(backend.uri());

    let llm: Arc<dyn LLMServiceTrait> = Arc::new(LLMService::new(&settings.llm).unwrap());
    let summarizer = Arc::new(Summarizer::with_temperature(llm, settings.llm.temperature));
    let use_case = Arc::new(IngestDocumentUseCase::new(summarizer));

    let server = TestServer::new(routes::app(use_case, &settings)).unwrap();

    TestApp { server, backend }
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use hubsum::application::usecases::ingest_document::IngestDocumentUseCase;
use hubsum::client::classifier::ScrapedPage;
use hubsum::client::pipeline::SummaryPipeline;
use hubsum::client::session::SessionGuard;
use hubsum::client::settings::ClientSettings;
use hubsum::client::state_machine::{Effect, Event, Phase};
use hubsum::domain::services::llm_service::{LLMService, LLMServiceTrait};
use hubsum::domain::services::summarizer::Summarizer;
use hubsum::presentation::routes;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::helpers::{generate_path, gemini_body, test_settings, CANNED_SUMMARY};

const PAGE_PATH: &str = "/d2l/le/content/123456/viewContent/7891011/View";
const DOWNLOAD_PATH: &str =
    "/d2l/le/content/123456/topics/files/download/7891011/DirectFileTopicDownload";

/// 在随机端口上启动真实服务，返回其地址
async fn serve(backend: &MockServer) -> String {
    let settings = test_settings(backend.uri());
    let llm: Arc<dyn LLMServiceTrait> = Arc::new(LLMService::new(&settings.llm).unwrap());
    let use_case = Arc::new(IngestDocumentUseCase::new(Arc::new(Summarizer::new(llm))));
    let app = routes::app(use_case, &settings);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

/// 学习平台上的内容页地址
fn page_url(hub: &MockServer) -> String {
    format!("{}{}", hub.uri(), PAGE_PATH)
}

fn client_settings(api_base_url: String, hub: &MockServer) -> ClientSettings {
    ClientSettings {
        api_base_url,
        hub_base_url: format!("{}/d2l/le/content/", hub.uri()),
        request_timeout_secs: 10,
    }
}

/// 页面有下载入口，文件是纯文本：按文件上传，由服务端提取
#[tokio::test]
async fn downloadable_text_file_flows_into_session() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .and(body_string_contains("Recursion needs a base case"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body(CANNED_SUMMARY)))
        .expect(1)
        .mount(&backend)
        .await;

    let hub = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DOWNLOAD_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/plain; charset=utf-8")
                .set_body_string("Recursion needs a base case.\n\nEach call shrinks the problem."),
        )
        .expect(1)
        .mount(&hub)
        .await;

    let api_base = serve(&backend).await;
    let pipeline = SummaryPipeline::from_settings(&client_settings(api_base, &hub)).unwrap();
    let page = ScrapedPage::new(
        page_url(&hub),
        r#"<html><body><a id="d2l-file-download-123456-7891011">Download</a></body></html>"#,
    );

    let guard = SessionGuard::new();
    let session = Mutex::new(
        guard
            .try_create(pipeline.classifier().download_target(&page_url(&hub)))
            .unwrap(),
    );
    assert!(guard.try_create(None).is_none());

    let effects = pipeline.drive(&session, &page, Event::Open).await;

    assert!(effects.is_empty());
    {
        let session = session.lock().await;
        assert_eq!(session.phase(), Phase::Summarized);
        assert_eq!(session.state().summary_text, CANNED_SUMMARY);
        assert_eq!(
            session.state().download_target_url.as_deref(),
            Some(format!("{}{}", hub.uri(), DOWNLOAD_PATH).as_str())
        );
    }

    let effects = pipeline.drive(&session, &page, Event::Download).await;
    match effects.as_slice() {
        [Effect::Export(artifact)] => {
            assert_eq!(artifact.file_name, "summary.txt");
            assert!(artifact.contents.starts_with("TLDR: Sorting algorithms"));
        }
        other => panic!("unexpected effects: {:?}", other),
    }
}

/// 下载地址不可用时上送整页标记，服务端只摘要可见文本
#[tokio::test]
async fn inline_page_falls_back_to_page_endpoint() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .and(body_string_contains("Vertices joined by edges."))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body(CANNED_SUMMARY)))
        .expect(1)
        .mount(&backend)
        .await;

    let hub = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DOWNLOAD_PATH))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&hub)
        .await;

    let api_base = serve(&backend).await;
    let pipeline = SummaryPipeline::from_settings(&client_settings(api_base, &hub)).unwrap();
    let page = ScrapedPage::new(
        page_url(&hub),
        "<html><body><h1>Graphs</h1><p>Vertices joined by edges.</p><script>track()</script></body></html>",
    );

    let summary = pipeline.summarize_page(&page).await;

    assert_eq!(summary, CANNED_SUMMARY);
}

/// 服务端失败时界面显示空摘要并退出加载状态
#[tokio::test]
async fn server_failure_settles_with_empty_summary() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .respond_with(ResponseTemplate::new(503))
        .mount(&backend)
        .await;

    let hub = MockServer::start().await;
    let api_base = serve(&backend).await;
    let pipeline = SummaryPipeline::from_settings(&client_settings(api_base, &hub)).unwrap();
    let page = ScrapedPage::new(
        page_url(&hub),
        "<html><body><p>Queues are FIFO.</p></body></html>",
    );

    let guard = SessionGuard::new();
    let session = Mutex::new(guard.try_create(None).unwrap());
    pipeline.drive(&session, &page, Event::Open).await;

    let session = session.lock().await;
    assert_eq!(session.phase(), Phase::Summarized);
    assert!(!session.state().is_loading);
    assert_eq!(session.state().summary_text, "");
    assert!(session.view().popup.unwrap().reload_enabled);
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Router,
};
use tower_http::trace::TraceLayer;

use crate::application::usecases::ingest_document::IngestDocumentUseCase;
use crate::config::settings::Settings;
use crate::presentation::handlers::summary_handler;
use crate::presentation::middleware::cors::cors_layer;

/// 创建应用路由
///
/// # 返回值
///
/// 返回未挂载状态和中间件的路由
pub fn routes() -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let summary_routes = Router::new()
        .route(
            "/buffer-to-file-summary",
            post(summary_handler::buffer_to_file_summary),
        )
        // older extension builds still post uploads here
        .route(
            "/buffer-to-text",
            post(summary_handler::buffer_to_file_summary),
        )
        .route("/summarize-text", post(summary_handler::summarize_text))
        .route("/summarize-page", post(summary_handler::summarize_page));

    Router::new().merge(public_routes).merge(summary_routes)
}

/// 创建完整应用
///
/// 挂载摄取用例、请求体上限、CORS 和请求追踪
pub fn app(use_case: Arc<IngestDocumentUseCase>, settings: &Settings) -> Router {
    routes()
        .layer(Extension(use_case))
        .layer(DefaultBodyLimit::max(settings.upload.max_file_bytes))
        .layer(cors_layer(&settings.cors))
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use hubsum::application::usecases::ingest_document::IngestDocumentUseCase;
use hubsum::config::settings::Settings;
use hubsum::domain::services::llm_service::{LLMService, LLMServiceTrait};
use hubsum::domain::services::summarizer::Summarizer;
use hubsum::presentation::routes;
use hubsum::utils::telemetry;
use tokio::net::TcpListener;
use tracing::{error, info};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting hubsum...");

    // 2. Load configuration; a missing API key aborts startup
    let settings = match Settings::new() {
        Ok(settings) => Arc::new(settings),
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };
    info!(
        "Configuration loaded ({:?} model {})",
        settings.llm.provider, settings.llm.model
    );

    // 3. Initialize Prometheus Metrics
    hubsum::infrastructure::metrics::init_metrics(&settings.metrics);

    // 4. Initialize Components
    let llm: Arc<dyn LLMServiceTrait> = Arc::new(LLMService::new(&settings.llm)?);
    let summarizer = Arc::new(Summarizer::with_temperature(llm, settings.llm.temperature));
    let use_case = Arc::new(IngestDocumentUseCase::new(summarizer));

    // 5. Start HTTP server
    let app = routes::app(use_case, &settings);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{error, info};

use super::api::{HttpSummaryApi, SummaryApi};
use super::classifier::{ContentClassifier, HttpResourceFetcher, PageContext, ResourceFetcher, SourceKind};
use super::errors::ClientError;
use super::session::Session;
use super::settings::ClientSettings;
use super::state_machine::{Effect, Event};

/// 分类 + 远程摘要
pub struct SummaryPipeline<F, A> {
    classifier: ContentClassifier<F>,
    api: A,
    timeout: Duration,
}

impl SummaryPipeline<HttpResourceFetcher, HttpSummaryApi> {
    /// 按配置构造基于 HTTP 的管道
    pub fn from_settings(settings: &ClientSettings) -> Result<Self, ClientError> {
        let timeout = settings.request_timeout();
        let fetcher = HttpResourceFetcher::new(timeout)?;
        let api = HttpSummaryApi::new(settings.api_base_url.clone(), timeout)?;
        Ok(Self::new(
            ContentClassifier::with_hub_base(fetcher, settings.hub_base_url.clone()),
            api,
            timeout,
        ))
    }
}

impl<F: ResourceFetcher, A: SummaryApi> SummaryPipeline<F, A> {
    pub fn new(classifier: ContentClassifier<F>, api: A, timeout: Duration) -> Self {
        Self {
            classifier,
            api,
            timeout,
        }
    }

    pub fn classifier(&self) -> &ContentClassifier<F> {
        &self.classifier
    }

    /// 在超时内完成分类和远程调用
    pub async fn try_summarize(&self, page: &dyn PageContext) -> Result<String, ClientError> {
        tokio::time::timeout(self.timeout, self.run(page))
            .await
            .map_err(|_| ClientError::Timeout(self.timeout))?
    }

    /// 与 `try_summarize` 相同，但任何错误都记录日志并返回空摘要
    pub async fn summarize_page(&self, page: &dyn PageContext) -> String {
        match self.try_summarize(page).await {
            Ok(summary) => summary,
            Err(e) => {
                error!("Failed to summarize {}: {}", page.url(), e);
                String::new()
            }
        }
    }

    async fn run(&self, page: &dyn PageContext) -> Result<String, ClientError> {
        let source = self.classifier.classify(page).await?;
        info!("Summarizing {} via {}", page.url(), source.as_str());

        match source {
            SourceKind::File { bytes, mime_type } => {
                let outcome = self.api.summarize_file(bytes, &mime_type).await?;
                Ok(outcome.summary)
            }
            SourceKind::PlainText { text } => self.api.summarize_text(&text).await,
            SourceKind::HtmlPage { html } => self.api.summarize_page(&html).await,
        }
    }

    /// 分发事件并执行其触发的请求，返回留给宿主的副作用（导出文件）
    ///
    /// 会话锁只在分发时持有，请求在途期间其他事件（最小化、展开）仍可分发
    pub async fn drive(
        &self,
        session: &Mutex<Session>,
        page: &dyn PageContext,
        event: Event,
    ) -> Vec<Effect> {
        let mut pending: VecDeque<Effect> = session.lock().await.dispatch(event).into();
        let mut surfaced = Vec::new();

        while let Some(effect) = pending.pop_front() {
            match effect {
                Effect::StartRequest { generation } => {
                    let outcome = self.try_summarize(page).await;
                    let effects = session.lock().await.dispatch(Event::Settled {
                        generation,
                        outcome,
                    });
                    pending.extend(effects);
                }
                other => surfaced.push(other),
            }
        }

        surfaced
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;

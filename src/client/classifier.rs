// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use scraper::{Html, Selector};
use tracing::{debug, info, warn};

use super::errors::{ClassificationError, ClientError};
use super::hub_url::{
    build_download_url, download_affordance_id, extract_ids, matches_content_page, ResourceIds,
    HUB_CONTENT_BASE,
};
use crate::domain::services::extraction_service::visible_text_from_html;

/// 宿主页面的只读视图
pub trait PageContext: Send + Sync {
    /// 当前页面地址
    fn url(&self) -> &str;

    /// 页面上是否存在指定 id 的元素
    fn has_element(&self, id: &str) -> bool;

    /// 页面可见文本
    fn visible_text(&self) -> String;

    /// 页面完整标记
    fn html(&self) -> String;
}

/// 抓取到的资源
#[derive(Debug, Clone)]
pub struct FetchedResource {
    /// 原始 `Content-Type` 头，缺失时为空
    pub content_type: String,
    pub bytes: Bytes,
}

/// 资源抓取接口
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedResource, ClientError>;
}

#[async_trait]
impl<T: ResourceFetcher + ?Sized> ResourceFetcher for Arc<T> {
    async fn fetch(&self, url: &str) -> Result<FetchedResource, ClientError> {
        (**self).fetch(url).await
    }
}

/// 基于 reqwest 的资源抓取器
#[derive(Clone)]
pub struct HttpResourceFetcher {
    client: reqwest::Client,
}

impl HttpResourceFetcher {
    pub fn new(timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ResourceFetcher for HttpResourceFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedResource, ClientError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Fetch {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = response.bytes().await?;

        Ok(FetchedResource {
            content_type,
            bytes,
        })
    }
}

/// 从抓取的 HTML 快照构造的页面视图
#[derive(Debug, Clone)]
pub struct ScrapedPage {
    url: String,
    html: String,
}

impl ScrapedPage {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }
}

impl PageContext for ScrapedPage {
    fn url(&self) -> &str {
        &self.url
    }

    fn has_element(&self, id: &str) -> bool {
        let Ok(selector) = Selector::parse("[id]") else {
            return false;
        };
        Html::parse_document(&self.html)
            .select(&selector)
            .any(|element| element.value().id() == Some(id))
    }

    fn visible_text(&self) -> String {
        visible_text_from_html(&self.html)
    }

    fn html(&self) -> String {
        self.html.clone()
    }
}

/// 页面内容的摄取路径
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// 可下载的文件，走上传提取
    File { bytes: Bytes, mime_type: String },
    /// 纯文本资源
    PlainText { text: String },
    /// 内联 HTML 页面，整页标记交给服务端提取
    HtmlPage { html: String },
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::File { .. } => "file",
            SourceKind::PlainText { .. } => "plain_text",
            SourceKind::HtmlPage { .. } => "html_page",
        }
    }
}

/// 内容分类器
///
/// 按固定顺序回退，不并发竞速：
/// 1. 页面有下载入口：抓取下载地址，任何非空响应都按文件上传
/// 2. 没有下载入口：仍抓取下载地址，按内容类型判断
/// 3. 抓取失败或不适用：上送整页标记
/// 4. 页面可见文本为空：`ClassificationError::Ambiguous`
///
/// 只有匹配 `hub_base_url` 的内容页才会抓取下载地址
pub struct ContentClassifier<F> {
    fetcher: F,
    hub_base_url: String,
}

impl<F: ResourceFetcher> ContentClassifier<F> {
    pub fn new(fetcher: F) -> Self {
        Self::with_hub_base(fetcher, HUB_CONTENT_BASE)
    }

    pub fn with_hub_base(fetcher: F, hub_base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            hub_base_url: hub_base_url.into(),
        }
    }

    /// 页面对应的文件下载地址，地址中没有合法标识时为 `None`
    pub fn download_target(&self, page_url: &str) -> Option<String> {
        self.resource_ids(page_url)
            .map(|ids| build_download_url(&self.hub_base_url, &ids))
    }

    fn resource_ids(&self, page_url: &str) -> Option<ResourceIds> {
        if !matches_content_page(page_url, &self.hub_base_url) {
            return None;
        }
        extract_ids(page_url)
    }

    pub async fn classify(&self, page: &dyn PageContext) -> Result<SourceKind, ClassificationError> {
        let url = page.url();

        match self.resource_ids(url) {
            Some(ids) => {
                let download_url = build_download_url(&self.hub_base_url, &ids);
                let has_affordance = page.has_element(&download_affordance_id(&ids));
                debug!(
                    "Classifying {} (download affordance: {})",
                    url, has_affordance
                );

                match self.fetcher.fetch(&download_url).await {
                    Ok(resource) => {
                        if let Some(kind) = from_fetched(resource, has_affordance) {
                            info!("Classified {} as {}", url, kind.as_str());
                            return Ok(kind);
                        }
                        debug!("Download URL for {} served page markup", url);
                    }
                    Err(e) => warn!("Failed to fetch {}: {}", download_url, e),
                }
            }
            None => debug!("{} is not a hub content page with resource ids", url),
        }

        if page.visible_text().trim().is_empty() {
            return Err(ClassificationError::Ambiguous(url.to_string()));
        }
        info!("Classified {} as html_page", url);
        Ok(SourceKind::HtmlPage { html: page.html() })
    }
}

/// 去掉 MIME 参数并转为小写
fn mime_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// 下载入口优先：有入口时不再看内容类型
fn from_fetched(resource: FetchedResource, has_affordance: bool) -> Option<SourceKind> {
    if resource.bytes.is_empty() {
        return None;
    }

    let mime = mime_essence(&resource.content_type);
    if has_affordance {
        let mime_type = if mime.is_empty() {
            "application/octet-stream".to_string()
        } else {
            mime
        };
        return Some(SourceKind::File {
            bytes: resource.bytes,
            mime_type,
        });
    }

    if mime.is_empty() || mime == "text/html" {
        return None;
    }
    if mime.starts_with("text/") {
        return Some(SourceKind::PlainText {
            text: String::from_utf8_lossy(&resource.bytes).into_owned(),
        });
    }
    Some(SourceKind::File {
        bytes: resource.bytes,
        mime_type: mime,
    })
}

#[cfg(test)]
#[path = "classifier_test.rs"]
mod tests;

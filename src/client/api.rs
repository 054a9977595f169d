// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::errors::ClientError;
use crate::application::dto::summary_request::{SummarizePageRequestDto, SummarizeTextRequestDto};
use crate::application::dto::summary_response::{ErrorResponseDto, SummaryResponseDto};
use crate::domain::models::document::IngestionOutcome;

/// 上传时使用的文件名，服务端以声明的 MIME 类型为准
const UPLOAD_FILE_NAME: &str = "document";

/// 摘要服务接口
#[async_trait]
pub trait SummaryApi: Send + Sync {
    /// 上传文件，返回提取文本与摘要
    async fn summarize_file(
        &self,
        bytes: Bytes,
        mime_type: &str,
    ) -> Result<IngestionOutcome, ClientError>;

    /// 直接摘要文本
    async fn summarize_text(&self, text: &str) -> Result<String, ClientError>;

    /// 上送整页标记，由服务端提取可见文本后摘要
    async fn summarize_page(&self, html: &str) -> Result<String, ClientError>;
}

/// 通过 HTTP 调用摘要服务
#[derive(Clone)]
pub struct HttpSummaryApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSummaryApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 成功时解析响应体，失败时读取 `{ error }` 信封
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let message = match response.json::<ErrorResponseDto>().await {
            Ok(body) => body.error,
            Err(_) => status.canonical_reason().unwrap_or_default().to_string(),
        };
        Err(ClientError::Server {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl SummaryApi for HttpSummaryApi {
    async fn summarize_file(
        &self,
        bytes: Bytes,
        mime_type: &str,
    ) -> Result<IngestionOutcome, ClientError> {
        debug!("Uploading {} bytes ({})", bytes.len(), mime_type);
        let part = Part::bytes(bytes.to_vec())
            .file_name(UPLOAD_FILE_NAME)
            .mime_str(mime_type)?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.endpoint("/buffer-to-file-summary"))
            .multipart(form)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn summarize_text(&self, text: &str) -> Result<String, ClientError> {
        debug!("Sending {} chars for summary", text.len());
        let response = self
            .client
            .post(self.endpoint("/summarize-text"))
            .json(&SummarizeTextRequestDto {
                text: Some(text.to_string()),
            })
            .send()
            .await?;
        let body: SummaryResponseDto = Self::decode(response).await?;
        Ok(body.summary)
    }

    async fn summarize_page(&self, html: &str) -> Result<String, ClientError> {
        debug!("Sending {} bytes of page markup for summary", html.len());
        let response = self
            .client
            .post(self.endpoint("/summarize-page"))
            .json(&SummarizePageRequestDto {
                html: Some(html.to_string()),
            })
            .send()
            .await?;
        let body: SummaryResponseDto = Self::decode(response).await?;
        Ok(body.summary)
    }
}

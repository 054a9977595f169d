// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info};

use crate::domain::models::document::{ExtractionRequest, IngestionOutcome, SummaryRequest};
use crate::domain::models::errors::IngestionError;
use crate::domain::services::extraction_service::{visible_text_from_html, TextExtractor};
use crate::domain::services::summarizer::Summarizer;

// === Section: Use Case Definition ===

/// 文档摄取用例
///
/// 服务端的三个入口：上传文件、原始文本、页面 HTML。
/// 每次调用自成一体，唯一共享的是无状态的后端客户端
pub struct IngestDocumentUseCase {
    extractor: TextExtractor,
    summarizer: Arc<Summarizer>,
}

// === Section: Implementation ===

impl IngestDocumentUseCase {
    pub fn new(summarizer: Arc<Summarizer>) -> Self {
        Self {
            extractor: TextExtractor::new(),
            summarizer,
        }
    }

    /// 提取上传文件的文本并生成摘要
    ///
    /// # 错误
    /// * 缺少文件或文件为空 - `ClientInput`
    /// * 文档无法解析 - `Extraction`
    /// * 后端调用失败 - `Backend`
    pub async fn handle_file_upload(
        &self,
        file_bytes: Option<Bytes>,
        mime_type: &str,
    ) -> Result<IngestionOutcome, IngestionError> {
        let file_bytes = file_bytes.filter(|b| !b.is_empty()).ok_or_else(|| {
            IngestionError::client_input(
                "File required (multipart/form-data, field name 'file'). Supported: PDF, Word, TXT",
            )
        })?;

        info!(
            "Ingesting uploaded file ({} bytes, {})",
            file_bytes.len(),
            mime_type
        );

        let request = ExtractionRequest::new(file_bytes, mime_type);
        let document = self.extractor.extract(&request).await?;
        let summary = self
            .summarizer
            .summarize(&SummaryRequest::new(document.plain_text.clone()))
            .await?;

        Ok(IngestionOutcome {
            extracted_text: document.plain_text,
            summary: summary.summary_html,
        })
    }

    /// 直接对纯文本生成摘要
    pub async fn handle_raw_text(&self, text: Option<&str>) -> Result<String, IngestionError> {
        let text = text
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| IngestionError::client_input("Missing 'text' field in request body."))?;

        debug!("Summarizing raw text ({} characters)", text.chars().count());
        Ok(self.summarizer.summarize_text(text).await?)
    }

    /// 对页面 HTML 的可见文本生成摘要
    pub async fn handle_page_html(&self, html: Option<&str>) -> Result<String, IngestionError> {
        let html = html
            .filter(|h| !h.trim().is_empty())
            .ok_or_else(|| IngestionError::client_input("Missing 'html' field in request body."))?;

        let text = visible_text_from_html(html);
        debug!(
            "Summarizing page capture ({} bytes of markup, {} characters visible)",
            html.len(),
            text.chars().count()
        );
        Ok(self.summarizer.summarize_text(&text).await?)
    }
}

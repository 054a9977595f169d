// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// 文本提取错误
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// PDF 解析失败
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    /// Word 文档解析失败
    #[error("Word document extraction failed: {0}")]
    Word(String),

    /// 阻塞任务异常终止
    #[error("extraction task failed: {0}")]
    Task(String),
}

/// 生成式文本后端错误
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("LLM API key not configured")]
    MissingApiKey,

    #[error("Failed to send request to LLM API: {0}")]
    Request(#[from] reqwest::Error),

    #[error("LLM API returned error: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("LLM API returned no text content")]
    EmptyResponse,

    #[error("Invalid response format from LLM API: {0}")]
    InvalidResponse(String),
}

/// 摄取错误
///
/// 端点边界统一转换为错误信封
#[derive(Error, Debug)]
pub enum IngestionError {
    /// 缺少或为空的必填字段
    #[error("{0}")]
    ClientInput(String),

    /// 文档载荷无法解析
    #[error("Failed to extract text from document: {0}")]
    Extraction(#[from] ExtractionError),

    /// 生成式后端调用失败
    #[error("Failed to generate summary: {0}")]
    Backend(#[from] LlmError),
}

impl IngestionError {
    pub fn client_input(message: impl Into<String>) -> Self {
        IngestionError::ClientInput(message.into())
    }

    /// 是否为调用方输入错误
    pub fn is_client_error(&self) -> bool {
        matches!(self, IngestionError::ClientInput(_))
    }
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// PDF 的 MIME 类型
pub const MIME_PDF: &str = "application/pdf";
/// Word OOXML 文档的 MIME 类型
pub const MIME_DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
/// 旧版 Word 二进制文档的 MIME 类型（与 OOXML 走同一路径）
pub const MIME_MSWORD: &str = "application/msword";

/// 文档格式
///
/// 由声明的 MIME 类型决定提取路径
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Word,
    /// 其他类型按 UTF-8 文本处理
    Text,
}

impl DocumentFormat {
    /// 根据声明的 MIME 类型选择格式
    ///
    /// 忽略参数部分（如 `; charset=utf-8`），大小写不敏感
    pub fn from_mime(declared_mime_type: &str) -> Self {
        let essence = declared_mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            MIME_PDF => DocumentFormat::Pdf,
            MIME_DOCX | MIME_MSWORD => DocumentFormat::Word,
            _ => DocumentFormat::Text,
        }
    }

    /// 格式名称，用于日志和指标标签
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Word => "word",
            DocumentFormat::Text => "text",
        }
    }
}

/// 根据文件扩展名推断 MIME 类型
///
/// 上传的分片没有声明 Content-Type 时使用
pub fn mime_from_file_name(file_name: &str) -> Option<&'static str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "pdf" => Some(MIME_PDF),
        "docx" => Some(MIME_DOCX),
        "doc" => Some(MIME_MSWORD),
        "txt" | "text" | "md" => Some("text/plain"),
        "htm" | "html" => Some("text/html"),
        _ => None,
    }
}

/// 提取请求
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub raw_bytes: Bytes,
    pub declared_mime_type: String,
}

impl ExtractionRequest {
    pub fn new(raw_bytes: impl Into<Bytes>, declared_mime_type: impl Into<String>) -> Self {
        Self {
            raw_bytes: raw_bytes.into(),
            declared_mime_type: declared_mime_type.into(),
        }
    }

    pub fn format(&self) -> DocumentFormat {
        DocumentFormat::from_mime(&self.declared_mime_type)
    }
}

/// 提取出的文档
///
/// 空字符串表示没有内容
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedDocument {
    pub plain_text: String,
}

/// 摘要请求
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub source_text: String,
}

impl SummaryRequest {
    pub fn new(source_text: impl Into<String>) -> Self {
        Self {
            source_text: source_text.into(),
        }
    }

    /// 空白输入不调用后端
    pub fn is_blank(&self) -> bool {
        self.source_text.trim().is_empty()
    }
}

/// 摘要结果
///
/// HTML 仅包含 `p`、`b`、`ol`、`li` 标签
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryResult {
    pub summary_html: String,
}

impl SummaryResult {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// 一次文件摄取的结果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngestionOutcome {
    #[serde(rename = "text")]
    pub extracted_text: String,
    pub summary: String,
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::io::{Cursor, Read};

use once_cell::sync::Lazy;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use scraper::Html;
use tracing::{debug, warn};
use zip::ZipArchive;

use crate::domain::models::document::{DocumentFormat, ExtractedDocument, ExtractionRequest};
use crate::domain::models::errors::ExtractionError;

/// OOXML 包中正文部件的路径
const WORD_DOCUMENT_PART: &str = "word/document.xml";

/// 正文部件解压后的默认上限，压缩包本身的大小由请求体上限约束
pub const MAX_WORD_DOCUMENT_BYTES: usize = 64 * 1024 * 1024;

/// 不可见元素，其文本不计入页面正文
const INVISIBLE_ELEMENTS: &[&str] = &["head", "script", "style", "noscript", "template"];

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// 文本提取服务
///
/// 根据声明的 MIME 类型把原始字节转换为纯文本：
/// - `application/pdf`：按页序拼接页面文本
/// - Word（OOXML 及旧版 `application/msword`）：提取段落文本
/// - 其他：按 UTF-8 有损解码
///
/// 无状态，可在并发请求间共享
#[derive(Debug, Clone, Copy)]
pub struct TextExtractor {
    /// 解压后 `word/document.xml` 的最大字节数
    max_document_bytes: usize,
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor {
    pub fn new() -> Self {
        Self {
            max_document_bytes: MAX_WORD_DOCUMENT_BYTES,
        }
    }

    /// 覆盖解压后正文部件的大小上限
    pub fn with_max_document_bytes(max_document_bytes: usize) -> Self {
        Self { max_document_bytes }
    }

    /// 提取纯文本
    ///
    /// # 参数
    /// * `request` - 原始字节和声明的 MIME 类型
    ///
    /// # 错误
    /// * PDF 或 Word 载荷损坏时返回 `ExtractionError`，文本回退路径从不报错
    pub async fn extract(
        &self,
        request: &ExtractionRequest,
    ) -> Result<ExtractedDocument, ExtractionError> {
        let format = request.format();
        debug!(
            "Extracting {} bytes as {} (declared: {})",
            request.raw_bytes.len(),
            format.as_str(),
            request.declared_mime_type
        );
        metrics::counter!("hubsum_extractions_total", "kind" => format.as_str()).increment(1);

        let result = match format {
            DocumentFormat::Pdf => {
                let bytes = request.raw_bytes.clone();
                // pdf-extract is CPU bound and may panic on hostile input
                tokio::task::spawn_blocking(move || extract_pdf_text(&bytes))
                    .await
                    .map_err(|e| {
                        if e.is_panic() {
                            ExtractionError::Pdf("parser aborted on malformed document".to_string())
                        } else {
                            ExtractionError::Task(e.to_string())
                        }
                    })
                    .and_then(|r| r)
            }
            DocumentFormat::Word => {
                let bytes = request.raw_bytes.clone();
                let limit = self.max_document_bytes;
                tokio::task::spawn_blocking(move || extract_word_text(&bytes, limit))
                    .await
                    .map_err(|e| ExtractionError::Task(e.to_string()))
                    .and_then(|r| r)
            }
            DocumentFormat::Text => Ok(decode_utf8_lossy(&request.raw_bytes)),
        };

        match result {
            Ok(plain_text) => {
                debug!("Extracted {} characters", plain_text.chars().count());
                Ok(ExtractedDocument { plain_text })
            }
            Err(e) => {
                warn!("Extraction failed for {}: {}", format.as_str(), e);
                metrics::counter!("hubsum_extraction_failures_total").increment(1);
                Err(e)
            }
        }
    }
}

/// 从内存中的 PDF 提取文本
fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractionError::Pdf(e.to_string()))
}

/// 从 Word OOXML 包中提取段落文本
///
/// 解压时最多读取 `limit + 1` 字节，声明大小或实际大小超限都返回错误
fn extract_word_text(bytes: &[u8], limit: usize) -> Result<String, ExtractionError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractionError::Word(format!("not a Word OOXML package: {}", e)))?;

    let part = archive
        .by_name(WORD_DOCUMENT_PART)
        .map_err(|e| ExtractionError::Word(format!("missing {}: {}", WORD_DOCUMENT_PART, e)))?;
    let too_large = || {
        ExtractionError::Word(format!(
            "{} exceeds the {} byte limit",
            WORD_DOCUMENT_PART, limit
        ))
    };
    if part.size() > limit as u64 {
        return Err(too_large());
    }

    let mut raw = Vec::new();
    part.take(limit as u64 + 1)
        .read_to_end(&mut raw)
        .map_err(|e| ExtractionError::Word(e.to_string()))?;
    if raw.len() > limit {
        return Err(too_large());
    }

    let xml = String::from_utf8(raw)
        .map_err(|e| ExtractionError::Word(format!("{} is not UTF-8: {}", WORD_DOCUMENT_PART, e)))?;
    paragraphs_from_document_xml(&xml)
}

/// 遍历 `document.xml`，段落之间以空行分隔
///
/// 只保留 `w:t` 中的文本；运行内的 `w:tab`、`w:br`、`w:cr` 转换为空白字符，
/// 其余格式、图片和嵌入对象全部丢弃
fn paragraphs_from_document_xml(xml: &str) -> Result<String, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:r" => in_run = true,
                b"w:t" => in_text = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:r" => in_run = false,
                b"w:t" => in_text = false,
                b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" if in_run => current.push('\t'),
                b"w:br" | b"w:cr" if in_run => current.push('\n'),
                b"w:p" => paragraphs.push(String::new()),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| ExtractionError::Word(e.to_string()))?;
                current.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractionError::Word(format!(
                    "malformed {} at position {}: {}",
                    WORD_DOCUMENT_PART,
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }

    Ok(paragraphs.join("\n\n").trim_end().to_string())
}

/// UTF-8 有损解码，非法字节替换为 U+FFFD
fn decode_utf8_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// 提取 HTML 页面中的可见文本
///
/// 跳过 `head`、`script`、`style` 等不可见元素，连续空白折叠为单个空格
pub fn visible_text_from_html(html: &str) -> String {
    let document = Html::parse_document(html);

    let pieces: Vec<&str> = document
        .root_element()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| INVISIBLE_ELEMENTS.contains(&el.name()))
            });
            if hidden {
                None
            } else {
                Some(&**text)
            }
        })
        .collect();

    WHITESPACE
        .replace_all(&pieces.join(" "), " ")
        .trim()
        .to_string()
}

#[cfg(test)]
#[path = "extraction_service_test.rs"]
mod tests;

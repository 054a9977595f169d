// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use axum::{
    extract::{
        multipart::{Multipart, MultipartRejection},
        rejection::JsonRejection,
        Extension, Json,
    },
    http::StatusCode,
};
use bytes::Bytes;
use tracing::debug;

use crate::application::dto::summary_request::{SummarizePageRequestDto, SummarizeTextRequestDto};
use crate::application::dto::summary_response::SummaryResponseDto;
use crate::application::usecases::ingest_document::IngestDocumentUseCase;
use crate::domain::models::document::{mime_from_file_name, IngestionOutcome};
use crate::presentation::errors::AppError;

/// 上传文件的表单字段名
pub const FILE_FIELD: &str = "file";

const FILE_ERROR_CONTEXT: &str = "Failed to parse and summarize file";

/// 上传文件 -> 提取 -> 摘要
///
/// 响应 `{ text, summary }`；缺少文件返回 400，提取或后端失败返回 500
pub async fn buffer_to_file_summary(
    Extension(use_case): Extension<Arc<IngestDocumentUseCase>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<IngestionOutcome>, AppError> {
    let mut multipart = multipart.map_err(|rejection| {
        AppError::bad_request(format!(
            "File required (multipart/form-data, field name '{}'): {}",
            FILE_FIELD,
            rejection.body_text()
        ))
    })?;

    let mut upload: Option<(Bytes, String)> = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(AppError::new(e.status(), e.body_text())),
        };

        if field.name() != Some(FILE_FIELD) {
            debug!("Ignoring multipart field {:?}", field.name());
            continue;
        }

        let mime_type = field
            .content_type()
            .filter(|ct| !ct.is_empty() && *ct != "application/octet-stream")
            .map(str::to_string)
            .or_else(|| {
                field
                    .file_name()
                    .and_then(mime_from_file_name)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::new(e.status(), e.body_text()))?;
        upload = Some((data, mime_type));
        break;
    }

    let (data, mime_type) = match upload {
        Some((data, mime_type)) => (Some(data), mime_type),
        None => (None, String::new()),
    };

    let outcome = use_case
        .handle_file_upload(data, &mime_type)
        .await
        .map_err(|e| AppError::from(e).with_server_context(FILE_ERROR_CONTEXT))?;

    Ok(Json(outcome))
}

/// 直接摘要纯文本
pub async fn summarize_text(
    Extension(use_case): Extension<Arc<IngestDocumentUseCase>>,
    payload: Result<Json<SummarizeTextRequestDto>, JsonRejection>,
) -> Result<Json<SummaryResponseDto>, AppError> {
    let Json(payload) = payload.map_err(json_rejection)?;
    let summary = use_case.handle_raw_text(payload.text.as_deref()).await?;
    Ok(Json(SummaryResponseDto { summary }))
}

/// 摘要页面捕获的 HTML
pub async fn summarize_page(
    Extension(use_case): Extension<Arc<IngestDocumentUseCase>>,
    payload: Result<Json<SummarizePageRequestDto>, JsonRejection>,
) -> Result<Json<SummaryResponseDto>, AppError> {
    let Json(payload) = payload.map_err(json_rejection)?;
    let summary = use_case.handle_page_html(payload.html.as_deref()).await?;
    Ok(Json(SummaryResponseDto { summary }))
}

/// JSON 解析失败统一按 400 处理，请求体过大保持 413
fn json_rejection(rejection: JsonRejection) -> AppError {
    let status = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        StatusCode::PAYLOAD_TOO_LARGE
    } else {
        StatusCode::BAD_REQUEST
    };
    AppError::new(status, rejection.body_text())
}

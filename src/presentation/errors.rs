// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

use crate::application::dto::summary_response::ErrorResponseDto;
use crate::domain::models::errors::IngestionError;

/// 应用错误类型
///
/// 端点边界的统一错误信封 `{ "error": "..." }`
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 为服务端错误添加前缀，调用方错误保持原样
    pub fn with_server_context(mut self, context: &str) -> Self {
        if self.status.is_server_error() {
            self.message = format!("{}: {}", context, self.message);
        }
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<IngestionError> for AppError {
    fn from(err: IngestionError) -> Self {
        let status = match &err {
            IngestionError::ClientInput(_) => StatusCode::BAD_REQUEST,
            IngestionError::Extraction(_) | IngestionError::Backend(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("Request failed ({}): {}", self.status, self.message);
        } else {
            warn!("Request rejected ({}): {}", self.status, self.message);
        }

        let body = Json(ErrorResponseDto {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

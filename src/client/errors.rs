// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::Duration;

use thiserror::Error;

/// 内容分类失败
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassificationError {
    /// 既拿不到文件，页面也没有可见文本
    #[error("No summarizable content found on {0}")]
    Ambiguous(String),
}

/// 客户端错误
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Classification(#[from] ClassificationError),

    #[error("Fetching {url} returned status {status}")]
    Fetch { url: String, status: u16 },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Summary service returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

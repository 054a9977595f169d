// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 原文摘要请求数据传输对象
///
/// `text` 缺失与空白都按调用方错误处理，因此声明为可选字段
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SummarizeTextRequestDto {
    /// 要摘要的纯文本
    pub text: Option<String>,
}

/// 页面摘要请求数据传输对象
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SummarizePageRequestDto {
    /// 页面渲染后的 HTML 或其可见文本
    pub html: Option<String>,
}

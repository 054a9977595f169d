// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 定义摄取管线中流转的数据结构和错误类型
pub mod document;
pub mod errors;

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含端点数据传输对象和摄取用例
/// 用例组合提取服务与摘要服务，不持有任何可变状态
pub mod dto;
pub mod usecases;

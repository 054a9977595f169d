// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据传输对象模块
///
/// 定义端点的请求、响应和错误信封，服务端与客户端共用
pub mod summary_request;
pub mod summary_response;

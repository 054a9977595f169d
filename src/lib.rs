// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 摄取用例和请求/响应数据传输对象
pub mod application;

/// 客户端模块
///
/// 页面内容分类、摘要请求编排和浮层状态机
pub mod client;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 文档模型、文本提取和摘要生成
pub mod domain;

/// 基础设施模块
///
/// Prometheus 指标导出
pub mod infrastructure;

/// 表示层模块
///
/// 处理HTTP请求和响应，包括路由、处理器和中间件
pub mod presentation;

/// 工具模块
///
/// HTML 清理与日志初始化
pub mod utils;

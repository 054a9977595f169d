// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：文档、摘要和错误类型
/// - 服务（services）：文本提取、LLM调用和摘要生成
///
/// 领域层不依赖于HTTP层，
/// 只包含摄取和摘要的业务规则。
pub mod models;
pub mod services;

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 提取服务（extraction_service）：把 PDF、Word 和文本载荷转换为纯文本
/// - LLM服务（llm_service）：与生成式文本后端交互
/// - 摘要服务（summarizer）：构造提示词、调用后端并清理输出
pub mod extraction_service;
pub mod llm_service;
pub mod summarizer;

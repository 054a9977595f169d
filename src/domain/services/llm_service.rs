// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::config::settings::{LlmProvider, LlmSettings};
use crate::domain::models::errors::LlmError;

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// 一次生成调用的结果
#[derive(Debug, Clone, Default)]
pub struct Generation {
    pub text: String,
    pub usage: TokenUsage,
}

/// 生成式文本后端
///
/// 实现必须可在并发请求间共享
#[async_trait]
pub trait LLMServiceTrait: Send + Sync {
    /// 以给定温度生成一次文本，不做重试
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<Generation, LlmError>;
}

/// LLM服务 - 处理与LLM提供商的交互
///
/// # 功能
///
/// 支持两种后端：
/// - Gemini `models/{model}:generateContent`
/// - OpenAI 兼容的 `/chat/completions`
///
/// 内部持有一个带超时的 `reqwest::Client`，可在请求间复用
pub struct LLMService {
    provider: LlmProvider,
    api_key: Option<String>,
    model: String,
    api_base_url: String,
    client: reqwest::Client,
}

#[async_trait]
impl LLMServiceTrait for LLMService {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<Generation, LlmError> {
        LLMService::generate(self, prompt, temperature).await
    }
}

impl LLMService {
    pub fn new(settings: &LlmSettings) -> Result<Self, LlmError> {
        let api_key = Some(settings.api_key.clone()).filter(|k| !k.trim().is_empty());
        Self::new_with_config(
            settings.provider,
            api_key,
            settings.model.clone(),
            settings.api_base_url.clone(),
            Duration::from_secs(settings.timeout_secs),
        )
    }

    pub fn new_with_config(
        provider: LlmProvider,
        api_key: Option<String>,
        model: String,
        api_base_url: String,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("hubsum/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            provider,
            api_key,
            model,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// 调用后端生成文本
    ///
    /// # 参数
    /// * `prompt` - 完整的提示词
    /// * `temperature` - 生成温度
    ///
    /// # 错误
    /// * 当LLM API密钥未配置时返回错误
    /// * 当LLM服务调用失败或响应中没有文本时返回错误
    pub async fn generate(&self, prompt: &str, temperature: f32) -> Result<Generation, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let request = match self.provider {
            LlmProvider::Gemini => {
                let url = format!(
                    "{}/models/{}:generateContent",
                    self.api_base_url, self.model
                );
                let body = json!({
                    "contents": [
                        { "role": "user", "parts": [ { "text": prompt } ] }
                    ],
                    "generationConfig": { "temperature": temperature }
                });
                self.client
                    .post(url)
                    .header("x-goog-api-key", api_key)
                    .json(&body)
            }
            LlmProvider::OpenAi => {
                let url = format!("{}/chat/completions", self.api_base_url);
                let body = json!({
                    "model": self.model,
                    "messages": [
                        { "role": "user", "content": prompt }
                    ],
                    "temperature": temperature
                });
                self.client.post(url).bearer_auth(api_key).json(&body)
            }
        };

        debug!(
            "Sending {} character prompt to {:?} model {}",
            prompt.chars().count(),
            self.provider,
            self.model
        );

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status { status, body });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        match self.provider {
            LlmProvider::Gemini => parse_gemini_response(&body),
            LlmProvider::OpenAi => parse_openai_response(&body),
        }
    }
}

fn parse_gemini_response(body: &Value) -> Result<Generation, LlmError> {
    let parts = body["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or_else(|| match body["promptFeedback"]["blockReason"].as_str() {
            Some(reason) => LlmError::InvalidResponse(format!("prompt blocked: {}", reason)),
            None => LlmError::EmptyResponse,
        })?;

    let text: String = parts
        .iter()
        .filter_map(|part| part["text"].as_str())
        .collect();

    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }

    let usage_val = &body["usageMetadata"];
    let usage = TokenUsage {
        prompt_tokens: usage_val["promptTokenCount"].as_u64().unwrap_or(0) as u32,
        completion_tokens: usage_val["candidatesTokenCount"].as_u64().unwrap_or(0) as u32,
        total_tokens: usage_val["totalTokenCount"].as_u64().unwrap_or(0) as u32,
    };

    Ok(Generation { text, usage })
}

fn parse_openai_response(body: &Value) -> Result<Generation, LlmError> {
    let text = body["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| LlmError::InvalidResponse("missing choices[0].message.content".to_string()))?;

    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }

    let usage = if let Some(usage_val) = body.get("usage") {
        TokenUsage {
            prompt_tokens: usage_val["prompt_tokens"].as_u64().unwrap_or(0) as u32,
            completion_tokens: usage_val["completion_tokens"].as_u64().unwrap_or(0) as u32,
            total_tokens: usage_val["total_tokens"].as_u64().unwrap_or(0) as u32,
        }
    } else {
        TokenUsage::default()
    };

    Ok(Generation {
        text: text.to_string(),
        usage,
    })
}

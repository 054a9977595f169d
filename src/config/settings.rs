// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含服务器、LLM后端、CORS、上传限制和指标等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 生成式文本后端配置
    pub llm: LlmSettings,
    /// 跨域配置
    pub cors: CorsSettings,
    /// 上传配置
    pub upload: UploadSettings,
    /// 指标配置
    pub metrics: MetricsSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// LLM 提供商
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Google Gemini `generateContent` 接口
    Gemini,
    /// OpenAI 兼容的 `/chat/completions` 接口
    OpenAi,
}

/// LLM 配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    /// 提供商
    pub provider: LlmProvider,
    /// API 密钥（必填）
    pub api_key: String,
    /// 模型名称
    pub model: String,
    /// API 基础URL
    pub api_base_url: String,
    /// 生成温度
    pub temperature: f32,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

/// 跨域配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// 允许的来源，末尾的 `*` 表示前缀匹配
    pub allowed_origins: Vec<String>,
}

/// 上传配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    /// 单个请求体的最大字节数
    pub max_file_bytes: usize,
}

/// 指标配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用 Prometheus 导出
    pub enabled: bool,
    /// 导出监听地址
    pub listen_addr: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载默认值、配置文件和 `HUBSUM__` 前缀的环境变量。
    /// 兼容旧的 `GEMINI_API_KEY` 与 `PORT` 环境变量。
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载且通过校验的配置
    /// * `Err(ConfigError)` - 配置加载失败或缺少 API 密钥
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let legacy_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
        let legacy_port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);

        let builder = Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", legacy_port)?
            // Default LLM settings
            .set_default("llm.provider", "gemini")?
            .set_default("llm.api_key", legacy_key)?
            .set_default("llm.model", "gemini-2.5-flash")?
            .set_default(
                "llm.api_base_url",
                "https://generativelanguage.googleapis.com/v1beta",
            )?
            .set_default("llm.temperature", 0.9)?
            .set_default("llm.timeout_secs", 120)?
            // Default CORS settings
            .set_default(
                "cors.allowed_origins",
                vec!["https://learn.bcit.ca", "chrome-extension://*"],
            )?
            // Default upload settings
            .set_default("upload.max_file_bytes", 25 * 1024 * 1024)?
            // Default metrics settings
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("HUBSUM")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins"),
            );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// 校验配置
    ///
    /// 缺少 API 密钥时拒绝启动
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.api_key.trim().is_empty() {
            return Err(ConfigError::Message(
                "Missing LLM API key: set GEMINI_API_KEY or HUBSUM__LLM__API_KEY".to_string(),
            ));
        }
        if self.upload.max_file_bytes == 0 {
            return Err(ConfigError::Message(
                "upload.max_file_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;

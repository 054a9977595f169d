// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::Duration;

use serde::Deserialize;

use super::hub_url::HUB_CONTENT_BASE;

/// 客户端配置
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSettings {
    /// 摘要服务地址
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// 课程内容页基础地址
    #[serde(default = "default_hub_base_url")]
    pub hub_base_url: String,
    /// 分类与远程调用的总超时（秒）
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_hub_base_url() -> String {
    HUB_CONTENT_BASE.to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            hub_base_url: default_hub_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

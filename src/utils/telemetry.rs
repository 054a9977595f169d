// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 日志格式环境变量，取值 `json` 时输出结构化 JSON
pub const LOG_FORMAT_ENV: &str = "HUBSUM_LOG_FORMAT";

/// 初始化日志
///
/// 过滤规则来自 `RUST_LOG`，默认 `info,hubsum=debug`。
/// 已有全局订阅者时返回 `false`
pub fn init_telemetry() -> bool {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,hubsum=debug".into());
    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .is_ok()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .is_ok()
    }
}

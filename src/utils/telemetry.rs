// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt as _, EnvFilter};

/// 初始化日志
///
/// 过滤规则取自 `RUST_LOG`，缺省为 `info,leadrs=debug`。
/// `LEADRS_LOG_FORMAT=json` 时输出结构化 JSON 日志。重复调用不会覆盖已安装的订阅者。
pub fn init_telemetry() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,leadrs=debug".into());
    let json = std::env::var("LEADRS_LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if json {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };
    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;
use serde_json::Value;

/// 抓取生命周期事件
///
/// 序列化格式为 `{"event": "<name>", "data": {...}}`，
/// 事件名与任务日志中记录的名称一致。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ProgressEvent {
    BrowserStarting {
        message: String,
    },
    Navigating {
        message: String,
    },
    Waiting {
        message: String,
    },
    Scrolling {
        count: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    ScrollComplete {
        count: u32,
    },
    ListingsFound {
        total: usize,
        message: String,
    },
    Extracting {
        current: usize,
        total: usize,
        collected: usize,
        business: String,
    },
    Enriching {
        current: usize,
        total: usize,
        business: String,
    },
    Error {
        message: String,
    },
    BrowserClosed {
        message: String,
    },
}

impl ProgressEvent {
    /// 事件名称
    pub fn name(&self) -> &'static str {
        match self {
            ProgressEvent::BrowserStarting { .. } => "browser_starting",
            ProgressEvent::Navigating { .. } => "navigating",
            ProgressEvent::Waiting { .. } => "waiting",
            ProgressEvent::Scrolling { .. } => "scrolling",
            ProgressEvent::ScrollComplete { .. } => "scroll_complete",
            ProgressEvent::ListingsFound { .. } => "listings_found",
            ProgressEvent::Extracting { .. } => "extracting",
            ProgressEvent::Enriching { .. } => "enriching",
            ProgressEvent::Error { .. } => "error",
            ProgressEvent::BrowserClosed { .. } => "browser_closed",
        }
    }

    /// 事件负载
    pub fn data(&self) -> Value {
        match serde_json::to_value(self) {
            Ok(Value::Object(mut map)) => map.remove("data").unwrap_or(Value::Null),
            _ => Value::Null,
        }
    }
}

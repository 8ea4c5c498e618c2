// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::domain::models::progress::ProgressEvent;

/// 进度接收方
///
/// 调用方通过实现此特质把抓取事件转化为自己的状态
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn report(&self, event: ProgressEvent);
}

/// 可选的进度上报句柄
#[derive(Clone, Default)]
pub struct Progress {
    sink: Option<Arc<dyn ProgressSink>>,
}

impl Progress {
    pub fn new(sink: Arc<dyn ProgressSink>) -> Self {
        Self { sink: Some(sink) }
    }

    /// 不上报任何事件
    pub fn none() -> Self {
        Self { sink: None }
    }

    pub async fn emit(&self, event: ProgressEvent) {
        debug!(event = event.name(), data = %event.data(), "progress");
        if let Some(sink) = &self.sink {
            sink.report(event).await;
        }
    }
}

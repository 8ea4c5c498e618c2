// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 包含商家条目、抓取任务和进度事件
pub mod job;
pub mod listing;
pub mod progress;

pub use job::{Job, JobLogEntry, JobPhase, JobProgress, JobStatus, ScrapeMode, ScrapeOptions};
pub use listing::{HasWebsite, ListingRecord};
pub use progress::ProgressEvent;

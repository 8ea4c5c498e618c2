// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

use super::listing::ListingRecord;
use super::progress::ProgressEvent;

/// 抓取模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScrapeMode {
    /// 直接读取列表视图，再对前 N 条做详情补全
    #[default]
    Fast,
    /// 逐条点击列表节点，读取详情面板
    Detail,
}

impl fmt::Display for ScrapeMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScrapeMode::Fast => write!(f, "fast"),
            ScrapeMode::Detail => write!(f, "detail"),
        }
    }
}

/// 单次抓取选项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeOptions {
    pub mode: ScrapeMode,
    /// 快速模式下做详情补全的条目数，0 表示不补全
    pub detail_limit: usize,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            mode: ScrapeMode::Fast,
            detail_limit: 10,
        }
    }
}

/// 任务状态
///
/// Pending → Running → Completed/Failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Running => write!(f, "running"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

/// 任务阶段，比状态更细粒度，用于前端展示
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobPhase {
    #[default]
    Pending,
    Starting,
    Navigating,
    Waiting,
    Scrolling,
    Extracting,
    Enriching,
    Completed,
    Failed,
}

/// 任务日志条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobLogEntry {
    /// 本地时间 `HH:MM:SS`
    pub time: String,
    pub event: String,
    pub data: Value,
}

/// 进度计数器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct JobProgress {
    pub scroll_count: u32,
    pub total_listings: usize,
    pub current: usize,
    pub collected: usize,
}

/// 抓取任务
///
/// 只存在于进程内存中，删除任务或进程退出即丢弃。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub query: String,
    pub options: ScrapeOptions,
    pub status: JobStatus,
    pub phase: JobPhase,
    pub progress: JobProgress,
    /// 去重后的条目数，完成后才有值
    pub total_leads: Option<usize>,
    pub csv_file: Option<PathBuf>,
    pub results: Option<Vec<ListingRecord>>,
    pub error: Option<String>,
    pub logs: VecDeque<JobLogEntry>,
    #[serde(skip)]
    log_capacity: usize,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    /// 创建处于 `pending` 状态的新任务
    ///
    /// # 参数
    ///
    /// * `query` - 搜索关键词
    /// * `options` - 抓取选项
    /// * `log_capacity` - 保留的日志条数上限，超出时丢弃最旧的条目
    pub fn new(query: impl Into<String>, options: ScrapeOptions, log_capacity: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            query: query.into(),
            options,
            status: JobStatus::Pending,
            phase: JobPhase::Pending,
            progress: JobProgress::default(),
            total_leads: None,
            csv_file: None,
            results: None,
            error: None,
            logs: VecDeque::new(),
            log_capacity: log_capacity.max(1),
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn push_log(&mut self, event: &str, data: Value) {
        if self.logs.len() >= self.log_capacity {
            self.logs.pop_front();
        }
        self.logs.push_back(JobLogEntry {
            time: Local::now().format("%H:%M:%S").to_string(),
            event: event.to_string(),
            data,
        });
    }

    /// 最近 `n` 条日志，按时间正序
    pub fn log_tail(&self, n: usize) -> Vec<JobLogEntry> {
        let skip = self.logs.len().saturating_sub(n);
        self.logs.iter().skip(skip).cloned().collect()
    }

    pub fn mark_running(&mut self) {
        self.status = JobStatus::Running;
        self.phase = JobPhase::Starting;
        let message = format!("Starting scrape for: {}", self.query);
        self.push_log("started", json!({ "message": message }));
    }

    /// 将抓取进度事件应用到任务状态
    pub fn apply_event(&mut self, event: &ProgressEvent) {
        self.push_log(event.name(), event.data());

        match event {
            ProgressEvent::BrowserStarting { .. } => self.phase = JobPhase::Starting,
            ProgressEvent::Navigating { .. } => self.phase = JobPhase::Navigating,
            ProgressEvent::Waiting { .. } => self.phase = JobPhase::Waiting,
            ProgressEvent::Scrolling { count, .. } | ProgressEvent::ScrollComplete { count } => {
                self.phase = JobPhase::Scrolling;
                self.progress.scroll_count = *count;
            }
            ProgressEvent::ListingsFound { total, .. } => {
                self.phase = JobPhase::Extracting;
                self.progress.total_listings = *total;
            }
            ProgressEvent::Extracting {
                current,
                total,
                collected,
                ..
            } => {
                self.phase = JobPhase::Extracting;
                self.progress.current = *current;
                self.progress.total_listings = *total;
                self.progress.collected = *collected;
            }
            // total_listings / collected 保留提取阶段的计数
            ProgressEvent::Enriching { current, .. } => {
                self.phase = JobPhase::Enriching;
                self.progress.current = *current;
            }
            ProgressEvent::Error { .. } | ProgressEvent::BrowserClosed { .. } => {}
        }
    }

    /// 标记任务完成
    pub fn complete(&mut self, results: Vec<ListingRecord>, csv_file: Option<PathBuf>) {
        let total = results.len();
        self.status = JobStatus::Completed;
        self.phase = JobPhase::Completed;
        self.total_leads = Some(total);
        self.progress.collected = total;
        self.csv_file = csv_file;
        self.results = Some(results);
        self.completed_at = Some(Utc::now());
        let message = format!("Completed! Found {} unique leads", total);
        self.push_log("completed", json!({ "message": message }));
    }

    /// 标记任务失败并记录错误信息
    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.status = JobStatus::Failed;
        self.phase = JobPhase::Failed;
        self.completed_at = Some(Utc::now());
        self.push_log("error", json!({ "message": message }));
        self.error = Some(message);
    }

    pub fn is_completed(&self) -> bool {
        self.status == JobStatus::Completed
    }
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::job::{Job, JobLogEntry, JobPhase, JobStatus, ScrapeMode};
use crate::domain::models::listing::ListingRecord;
use crate::domain::services::listing_service::{summarize, LeadSummary};

/// 提交抓取任务的响应
#[derive(Debug, Deserialize, Serialize)]
pub struct ScrapeResponseDto {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub message: String,
}

/// 任务状态与进度
#[derive(Debug, Deserialize, Serialize)]
pub struct JobStatusDto {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub phase: JobPhase,
    pub query: String,
    pub mode: ScrapeMode,
    pub total_leads: Option<usize>,
    pub total_listings: usize,
    pub current: usize,
    pub collected: usize,
    pub scroll_count: u32,
    pub csv_file: Option<String>,
    pub error: Option<String>,
    /// 最近的日志，按时间顺序
    pub logs: Vec<JobLogEntry>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl JobStatusDto {
    pub fn from_job(job: &Job, log_tail: usize) -> Self {
        Self {
            job_id: job.id,
            status: job.status,
            phase: job.phase,
            query: job.query.clone(),
            mode: job.options.mode,
            total_leads: job.total_leads,
            total_listings: job.progress.total_listings,
            current: job.progress.current,
            collected: job.progress.collected,
            scroll_count: job.progress.scroll_count,
            csv_file: job.csv_file.as_ref().map(|p| p.display().to_string()),
            error: job.error.clone(),
            logs: job.log_tail(log_tail),
            started_at: job.started_at,
            completed_at: job.completed_at,
        }
    }
}

/// 已完成任务的完整结果
#[derive(Debug, Deserialize, Serialize)]
pub struct JobResultsDto {
    pub job_id: Uuid,
    pub query: String,
    pub total_leads: usize,
    pub summary: LeadSummary,
    pub leads: Vec<ListingRecord>,
}

impl JobResultsDto {
    pub fn from_job(job: &Job) -> Self {
        let leads = job.results.clone().unwrap_or_default();
        Self {
            job_id: job.id,
            query: job.query.clone(),
            total_leads: leads.len(),
            summary: summarize(&leads),
            leads,
        }
    }
}

/// 任务列表中的一项
#[derive(Debug, Deserialize, Serialize)]
pub struct JobSummaryDto {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub query: String,
    pub total_leads: Option<usize>,
    pub started_at: DateTime<Utc>,
}

impl From<&Job> for JobSummaryDto {
    fn from(job: &Job) -> Self {
        Self {
            job_id: job.id,
            status: job.status,
            query: job.query.clone(),
            total_leads: job.total_leads,
            started_at: job.started_at,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct JobListDto {
    pub total_jobs: usize,
    pub jobs: Vec<JobSummaryDto>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteJobResponseDto {
    pub success: bool,
    pub message: String,
}

/// 服务信息
#[derive(Debug, Deserialize, Serialize)]
pub struct ApiInfoDto {
    pub name: String,
    pub version: String,
}

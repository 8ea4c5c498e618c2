// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use metrics::{counter, histogram};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::settings::JobSettings;
use crate::domain::models::job::{Job, JobStatus, ScrapeOptions};
use crate::domain::models::progress::ProgressEvent;
use crate::domain::repositories::job_repository::{JobRepository, JobUpdate, RepositoryError};
use crate::domain::services::listing_service::{deduplicate, summarize};
use crate::infrastructure::metrics::{
    JOBS_COMPLETED_TOTAL, JOBS_FAILED_TOTAL, JOBS_TOTAL, JOB_DURATION_SECONDS,
    LISTINGS_EXTRACTED_TOTAL,
};
use crate::infrastructure::storage::CsvExporter;
use crate::maps::{MapsScraper, Progress, ProgressSink};

#[derive(Error, Debug)]
pub enum ScrapeJobError {
    #[error("{0}")]
    ValidationError(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("Job is {0}, not completed yet")]
    NotCompleted(JobStatus),
    #[error("CSV file not found")]
    CsvMissing,
}

/// 抓取任务服务
///
/// 负责任务的创建、后台执行、查询和删除。每个任务在独立的
/// tokio任务中运行并独占一个浏览器，任务之间没有共享状态。
pub struct ScrapeJobService<R> {
    repo: Arc<R>,
    scraper: Arc<MapsScraper>,
    exporter: CsvExporter,
    settings: JobSettings,
}

impl<R> ScrapeJobService<R>
where
    R: JobRepository + 'static,
{
    pub fn new(
        repo: Arc<R>,
        scraper: Arc<MapsScraper>,
        exporter: CsvExporter,
        settings: JobSettings,
    ) -> Self {
        Self {
            repo,
            scraper,
            exporter,
            settings,
        }
    }

    /// 状态查询返回的日志条数
    pub fn log_tail(&self) -> usize {
        self.settings.log_tail
    }

    pub fn default_options(&self) -> ScrapeOptions {
        self.scraper.settings().default_options()
    }

    /// 创建任务并在后台开始执行
    ///
    /// 立即返回处于 `pending` 状态的任务快照
    pub async fn submit(
        &self,
        query: &str,
        options: ScrapeOptions,
    ) -> Result<Job, ScrapeJobError> {
        let job = self.create(query, options).await?;
        info!(job_id = %job.id, mode = %options.mode, "Scraping job started for query: {}", job.query);

        let runner = self.runner();
        let (id, query) = (job.id, job.query.clone());
        tokio::spawn(async move {
            runner.run(id, query, options).await;
        });

        Ok(job)
    }

    /// 在当前任务中执行到结束，返回最终任务快照
    pub async fn execute(
        &self,
        query: &str,
        options: ScrapeOptions,
    ) -> Result<Job, ScrapeJobError> {
        let job = self.create(query, options).await?;
        self.runner().run(job.id, job.query.clone(), options).await;
        self.get(job.id).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Job, ScrapeJobError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ScrapeJobError::Repository(RepositoryError::NotFound))
    }

    pub async fn list(&self) -> Result<Vec<Job>, ScrapeJobError> {
        Ok(self.repo.list().await?)
    }

    /// 获取已完成的任务，未完成时报错
    pub async fn completed(&self, id: Uuid) -> Result<Job, ScrapeJobError> {
        let job = self.get(id).await?;
        if !job.is_completed() {
            return Err(ScrapeJobError::NotCompleted(job.status));
        }
        Ok(job)
    }

    /// 已完成任务的CSV文件路径
    pub async fn csv_file(&self, id: Uuid) -> Result<PathBuf, ScrapeJobError> {
        let job = self.completed(id).await?;
        match job.csv_file {
            Some(path) if tokio::fs::try_exists(&path).await.unwrap_or(false) => Ok(path),
            _ => Err(ScrapeJobError::CsvMissing),
        }
    }

    /// 删除任务及其CSV文件
    ///
    /// 文件删除失败只记录日志
    pub async fn delete(&self, id: Uuid) -> Result<Job, ScrapeJobError> {
        let job = self.repo.delete(id).await?;
        if let Some(path) = &job.csv_file {
            if let Err(e) = self.exporter.remove(path).await {
                warn!(job_id = %id, "Failed to remove {}: {}", path.display(), e);
            }
        }
        info!(job_id = %id, "Job deleted");
        Ok(job)
    }

    async fn create(&self, query: &str, options: ScrapeOptions) -> Result<Job, ScrapeJobError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ScrapeJobError::ValidationError(
                "Query cannot be empty".to_string(),
            ));
        }

        let job = self
            .repo
            .create(Job::new(query, options, self.settings.log_capacity))
            .await?;
        counter!(JOBS_TOTAL).increment(1);
        Ok(job)
    }

    fn runner(&self) -> JobRunner<R> {
        JobRunner {
            repo: self.repo.clone(),
            scraper: self.scraper.clone(),
            exporter: self.exporter.clone(),
        }
    }
}

/// 单个任务的执行体
struct JobRunner<R> {
    repo: Arc<R>,
    scraper: Arc<MapsScraper>,
    exporter: CsvExporter,
}

impl<R> JobRunner<R>
where
    R: JobRepository + 'static,
{
    async fn run(self, id: Uuid, query: String, options: ScrapeOptions) {
        let started = Instant::now();
        apply(self.repo.as_ref(), id, Box::new(|job: &mut Job| job.mark_running())).await;

        let progress = Progress::new(Arc::new(JobProgressSink {
            repo: self.repo.clone(),
            job_id: id,
        }));

        match self.scraper.scrape(&query, &options, &progress).await {
            Ok(records) => {
                let leads = deduplicate(records);
                let csv_file = if leads.is_empty() {
                    None
                } else {
                    match self.exporter.export(&query, &leads).await {
                        Ok(path) => Some(path),
                        Err(e) => {
                            error!(job_id = %id, "Failed to save CSV: {}", e);
                            self.fail(id, format!("Failed to save CSV: {}", e)).await;
                            record_duration(started);
                            return;
                        }
                    }
                };

                let summary = summarize(&leads);
                info!(
                    job_id = %id,
                    total = summary.total,
                    with_website = summary.with_website,
                    without_website = summary.without_website,
                    "Completed! Found {} unique leads",
                    summary.total
                );
                counter!(LISTINGS_EXTRACTED_TOTAL).increment(leads.len() as u64);
                counter!(JOBS_COMPLETED_TOTAL).increment(1);
                let exported = csv_file.clone();
                let kept = apply(
                    self.repo.as_ref(),
                    id,
                    Box::new(move |job: &mut Job| job.complete(leads, csv_file)),
                )
                .await;
                if let (false, Some(path)) = (kept, exported) {
                    info!(job_id = %id, "Job deleted while running, removing {}", path.display());
                    if let Err(e) = self.exporter.remove(&path).await {
                        warn!(job_id = %id, "Failed to remove orphaned CSV: {}", e);
                    }
                }
            }
            Err(e) => {
                error!(job_id = %id, "Scrape job failed: {}", e);
                self.fail(id, e.to_string()).await;
            }
        }

        record_duration(started);
    }

    async fn fail(&self, id: Uuid, message: String) {
        counter!(JOBS_FAILED_TOTAL).increment(1);
        apply(
            self.repo.as_ref(),
            id,
            Box::new(move |job: &mut Job| job.fail(message)),
        )
        .await;
    }
}

fn record_duration(started: Instant) {
    histogram!(JOB_DURATION_SECONDS).record(started.elapsed().as_secs_f64());
}

// 任务可能在运行中被删除，此时丢弃更新并返回 false
async fn apply<R: JobRepository>(repo: &R, id: Uuid, update: JobUpdate) -> bool {
    match repo.update(id, update).await {
        Ok(_) => true,
        Err(RepositoryError::NotFound) => {
            debug!(job_id = %id, "Job no longer exists, update dropped");
            false
        }
        Err(e) => {
            warn!(job_id = %id, "Failed to update job: {}", e);
            true
        }
    }
}

/// 把抓取进度写回任务表
struct JobProgressSink<R> {
    repo: Arc<R>,
    job_id: Uuid,
}

#[async_trait]
impl<R> ProgressSink for JobProgressSink<R>
where
    R: JobRepository + 'static,
{
    async fn report(&self, event: ProgressEvent) {
        apply(
            self.repo.as_ref(),
            self.job_id,
            Box::new(move |job: &mut Job| job.apply_event(&event)),
        )
        .await;
    }
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Json, Path},
    http::header,
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::application::dto::job_response::{
    DeleteJobResponseDto, JobListDto, JobResultsDto, JobStatusDto, JobSummaryDto,
    ScrapeResponseDto,
};
use crate::application::dto::scrape_request::{first_validation_message, ScrapeRequestDto};
use crate::application::use_cases::scrape_job::{ScrapeJobError, ScrapeJobService};
use crate::domain::repositories::job_repository::{JobRepository, RepositoryError};
use crate::presentation::errors::AppError;

// 无法解析的ID与不存在的任务同样处理
fn parse_job_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw)
        .map_err(|_| AppError::from(ScrapeJobError::Repository(RepositoryError::NotFound)))
}

/// 提交抓取任务
pub async fn create_job<R: JobRepository + 'static>(
    Extension(service): Extension<Arc<ScrapeJobService<R>>>,
    Json(payload): Json<ScrapeRequestDto>,
) -> Result<Json<ScrapeResponseDto>, AppError> {
    if let Err(errors) = payload.validate() {
        return Err(ScrapeJobError::ValidationError(first_validation_message(&errors)).into());
    }

    let options = payload.options(service.default_options());
    let job = service.submit(&payload.query, options).await?;

    Ok(Json(ScrapeResponseDto {
        job_id: job.id,
        status: job.status,
        message: format!("Scraping job started for query: {}", job.query),
    }))
}

/// 查询任务状态和最近日志
pub async fn get_job<R: JobRepository + 'static>(
    Extension(service): Extension<Arc<ScrapeJobService<R>>>,
    Path(id): Path<String>,
) -> Result<Json<JobStatusDto>, AppError> {
    let job = service.get(parse_job_id(&id)?).await?;
    Ok(Json(JobStatusDto::from_job(&job, service.log_tail())))
}

/// 获取已完成任务的全部结果
pub async fn get_job_results<R: JobRepository + 'static>(
    Extension(service): Extension<Arc<ScrapeJobService<R>>>,
    Path(id): Path<String>,
) -> Result<Json<JobResultsDto>, AppError> {
    let job = service.completed(parse_job_id(&id)?).await?;
    Ok(Json(JobResultsDto::from_job(&job)))
}

/// 下载已完成任务的CSV文件
pub async fn download_job_csv<R: JobRepository + 'static>(
    Extension(service): Extension<Arc<ScrapeJobService<R>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let path = service.csv_file(parse_job_id(&id)?).await?;
    let body = tokio::fs::read(&path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "leads.csv".to_string());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!(
                    "attachment; filename*=UTF-8''{}",
                    urlencoding::encode(&file_name)
                ),
            ),
        ],
        body,
    ))
}

/// 列出全部任务
pub async fn list_jobs<R: JobRepository + 'static>(
    Extension(service): Extension<Arc<ScrapeJobService<R>>>,
) -> Result<Json<JobListDto>, AppError> {
    let jobs = service.list().await?;
    Ok(Json(JobListDto {
        total_jobs: jobs.len(),
        jobs: jobs.iter().map(JobSummaryDto::from).collect(),
    }))
}

/// 删除任务及其CSV文件
pub async fn delete_job<R: JobRepository + 'static>(
    Extension(service): Extension<Arc<ScrapeJobService<R>>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteJobResponseDto>, AppError> {
    let job = service.delete(parse_job_id(&id)?).await?;
    Ok(Json(DeleteJobResponseDto {
        success: true,
        message: format!("Job {} deleted successfully", job.id),
    }))
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    routing::{get, post},
    Extension, Json, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::application::dto::job_response::ApiInfoDto;
use crate::application::use_cases::scrape_job::ScrapeJobService;
use crate::domain::repositories::job_repository::JobRepository;
use crate::presentation::handlers::job_handler;

/// 创建应用路由
///
/// # 参数
///
/// * `service` - 抓取任务服务
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes<R: JobRepository + 'static>(service: Arc<ScrapeJobService<R>>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api", get(api_info))
        .route("/scrape", post(job_handler::create_job::<R>))
        .route("/jobs", get(job_handler::list_jobs::<R>))
        .route(
            "/job/{id}",
            get(job_handler::get_job::<R>).delete(job_handler::delete_job::<R>),
        )
        .route("/job/{id}/results", get(job_handler::get_job_results::<R>))
        .route("/job/{id}/download", get(job_handler::download_job_csv::<R>))
        .layer(Extension(service))
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 服务信息端点
pub async fn api_info() -> Json<ApiInfoDto> {
    Json(ApiInfoDto {
        name: "Lead Generator API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

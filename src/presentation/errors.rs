// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::application::use_cases::scrape_job::ScrapeJobError;
use crate::domain::repositories::job_repository::RepositoryError;

/// 应用错误类型
///
/// 封装所有可能的应用层错误，提供统一的错误处理接口
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl AppError {
    fn status(&self) -> StatusCode {
        if let Some(err) = self.0.downcast_ref::<ScrapeJobError>() {
            return match err {
                ScrapeJobError::ValidationError(_) | ScrapeJobError::NotCompleted(_) => {
                    StatusCode::BAD_REQUEST
                }
                ScrapeJobError::Repository(RepositoryError::NotFound)
                | ScrapeJobError::CsvMissing => StatusCode::NOT_FOUND,
                ScrapeJobError::Repository(RepositoryError::AlreadyExists(_)) => {
                    StatusCode::CONFLICT
                }
            };
        }

        match self.0.downcast_ref::<RepositoryError>() {
            Some(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            Some(RepositoryError::AlreadyExists(_)) => StatusCode::CONFLICT,
            None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

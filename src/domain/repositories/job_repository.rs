// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::models::job::Job;

/// 仓库层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Job not found")]
    NotFound,

    #[error("Job already exists: {0}")]
    AlreadyExists(Uuid),
}

/// 对单个任务的原子修改
pub type JobUpdate = Box<dyn FnOnce(&mut Job) + Send>;

/// 任务仓库特质
///
/// 所有对任务表的访问都经过此接口，实现方负责并发安全。
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// 保存新任务
    async fn create(&self, job: Job) -> Result<Job, RepositoryError>;

    /// 按ID查找任务
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Job>, RepositoryError>;

    /// 列出全部任务，按创建时间排序
    async fn list(&self) -> Result<Vec<Job>, RepositoryError>;

    /// 在持有该任务独占访问的情况下执行修改，返回修改后的快照
    async fn update(&self, id: Uuid, update: JobUpdate) -> Result<Job, RepositoryError>;

    /// 删除任务，返回被删除的任务
    async fn delete(&self, id: Uuid) -> Result<Job, RepositoryError>;
}

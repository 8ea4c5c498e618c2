// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::job::Job;
use crate::domain::repositories::job_repository::{JobRepository, JobUpdate, RepositoryError};

/// 内存任务仓库
///
/// 任务表只存在于进程内存中，以任务ID分片加锁。
#[derive(Clone, Debug, Default)]
pub struct InMemoryJobRepository {
    jobs: Arc<DashMap<Uuid, Job>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn create(&self, job: Job) -> Result<Job, RepositoryError> {
        match self.jobs.entry(job.id) {
            Entry::Occupied(_) => Err(RepositoryError::AlreadyExists(job.id)),
            Entry::Vacant(slot) => {
                slot.insert(job.clone());
                Ok(job)
            }
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Job>, RepositoryError> {
        Ok(self.jobs.get(&id).map(|job| job.clone()))
    }

    async fn list(&self) -> Result<Vec<Job>, RepositoryError> {
        let mut jobs: Vec<Job> = self.jobs.iter().map(|entry| entry.value().clone()).collect();
        jobs.sort_by_key(|job| job.started_at);
        Ok(jobs)
    }

    async fn update(&self, id: Uuid, update: JobUpdate) -> Result<Job, RepositoryError> {
        let mut job = self.jobs.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        update(job.value_mut());
        Ok(job.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<Job, RepositoryError> {
        self.jobs
            .remove(&id)
            .map(|(_, job)| job)
            .ok_or(RepositoryError::NotFound)
    }
}

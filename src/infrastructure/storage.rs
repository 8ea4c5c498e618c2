// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Local};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::models::listing::ListingRecord;

/// 导出错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Export task failed: {0}")]
    Join(String),
}

/// CSV 导出器
///
/// 每次导出写一个新文件 `leads_<查询>_<时间戳>.csv`，列顺序与
/// [`ListingRecord`] 字段顺序一致
#[derive(Debug, Clone)]
pub struct CsvExporter {
    output_dir: PathBuf,
}

impl CsvExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// 生成导出文件名
    ///
    /// 查询词只保留字母数字、下划线、空白和连字符，空格替换为下划线，
    /// 最长30个字符
    pub fn file_name(query: &str, now: DateTime<Local>) -> String {
        let safe_query: String = query
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
            .map(|c| if c == ' ' { '_' } else { c })
            .take(30)
            .collect();
        format!("leads_{}_{}.csv", safe_query, now.format("%Y%m%d_%H%M%S"))
    }

    /// 写出记录并返回文件路径
    ///
    /// 同名文件已存在时（同一秒内相同查询的并发任务）依次尝试
    /// `_2`、`_3` 等后缀，已有文件不会被覆盖
    pub async fn export(
        &self,
        query: &str,
        records: &[ListingRecord],
    ) -> Result<PathBuf, ExportError> {
        let dir = self.output_dir.clone();
        let file_name = Self::file_name(query, Local::now());
        let count = records.len();
        let records = records.to_vec();

        let path = tokio::task::spawn_blocking(move || -> Result<PathBuf, ExportError> {
            std::fs::create_dir_all(&dir)?;
            let (path, file) = create_unique(&dir, &file_name)?;
            let mut writer = csv::WriterBuilder::new().from_writer(file);
            for record in &records {
                writer.serialize(record)?;
            }
            writer.flush()?;
            Ok(path)
        })
        .await
        .map_err(|e| ExportError::Join(e.to_string()))??;

        info!("Saved {} leads to {}", count, path.display());
        Ok(path)
    }

    /// 删除导出文件，文件不存在不算错误
    pub async fn remove(&self, path: &Path) -> Result<(), ExportError> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => {
                debug!("Removed export {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

const MAX_NAME_ATTEMPTS: usize = 1000;

// create_new 保证并发导出不会写到同一个文件
fn create_unique(dir: &Path, file_name: &str) -> Result<(PathBuf, File), ExportError> {
    let stem = file_name.strip_suffix(".csv").unwrap_or(file_name);
    for attempt in 1..=MAX_NAME_ATTEMPTS {
        let path = if attempt == 1 {
            dir.join(file_name)
        } else {
            dir.join(format!("{}_{}.csv", stem, attempt))
        };
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Err(std::io::Error::new(
        std::io::ErrorKind::AlreadyExists,
        format!("no free export name for {}", file_name),
    )
    .into())
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

use crate::engines::traits::EngineError;

/// 抓取流程错误类型
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// 浏览器操作失败
    #[error("Browser error: {0}")]
    Engine(#[from] EngineError),

    /// 结果列表始终没有出现
    #[error("Could not find results panel")]
    FeedNotFound,

    /// 选择器无法解析
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// 抓取循环发生 panic
    #[error("Scrape loop panicked: {0}")]
    Panicked(String),
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::models::job::{ScrapeMode, ScrapeOptions};

/// 抓取请求数据传输对象
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ScrapeRequestDto {
    /// 搜索词，例如 "restaurants in New York"
    #[validate(custom(function = "validate_query"))]
    pub query: String,
    /// 抓取模式，缺省使用配置中的默认值
    pub mode: Option<ScrapeMode>,
    /// 快速模式下详情补全的条目数
    #[validate(range(max = 1000))]
    pub detail_limit: Option<usize>,
}

fn validate_query(query: &str) -> Result<(), ValidationError> {
    if query.trim().is_empty() {
        return Err(ValidationError::new("empty_query")
            .with_message(Cow::Borrowed("Query cannot be empty")));
    }
    Ok(())
}

impl ScrapeRequestDto {
    /// 以配置默认值补齐未指定的选项
    pub fn options(&self, defaults: ScrapeOptions) -> ScrapeOptions {
        ScrapeOptions {
            mode: self.mode.unwrap_or(defaults.mode),
            detail_limit: self.detail_limit.unwrap_or(defaults.detail_limit),
        }
    }
}

/// 取第一条校验错误的可读信息
pub fn first_validation_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("Invalid value for '{}'", field),
            })
        })
        .next()
        .unwrap_or_else(|| "Invalid request".to_string())
}

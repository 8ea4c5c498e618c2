// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::models::listing::{HasWebsite, ListingRecord};

/// 按 `(business_name, address)` 去重，保留首次出现的顺序
pub fn deduplicate(records: Vec<ListingRecord>) -> Vec<ListingRecord> {
    let mut seen: HashSet<(String, String)> = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| {
            let (name, address) = record.dedup_key();
            seen.insert((name.to_string(), address.to_string()))
        })
        .collect()
}

/// 结果汇总
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LeadSummary {
    pub total: usize,
    pub with_website: usize,
    /// 没有官网的商家
    pub without_website: usize,
}

pub fn summarize(records: &[ListingRecord]) -> LeadSummary {
    records.iter().fold(
        LeadSummary {
            total: records.len(),
            ..Default::default()
        },
        |mut summary, record| {
            match record.has_website {
                HasWebsite::Yes => summary.with_website += 1,
                HasWebsite::No => summary.without_website += 1,
                HasWebsite::Unknown => {}
            }
            summary
        },
    )
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 网站存在性标记
///
/// 详情面板和列表卡片能确定时为 `Yes`/`No`，
/// 仅凭原始链接兜底提取时无法判断，记为 `Unknown`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum HasWebsite {
    Yes,
    No,
    #[default]
    Unknown,
}

impl HasWebsite {
    /// 根据网站URL推导存在性
    pub fn from_url(url: &str) -> Self {
        if url.trim().is_empty() {
            HasWebsite::No
        } else {
            HasWebsite::Yes
        }
    }
}

impl fmt::Display for HasWebsite {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HasWebsite::Yes => write!(f, "Yes"),
            HasWebsite::No => write!(f, "No"),
            HasWebsite::Unknown => write!(f, "Unknown"),
        }
    }
}

/// 商家条目
///
/// 一次抓取中每个列表节点对应一条记录。字段顺序即 CSV 列顺序。
/// `business_name` 永不为空，提取层负责丢弃无名称的节点。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ListingRecord {
    /// 商家名称
    pub business_name: String,
    /// 分类
    pub category: String,
    /// 地址
    pub address: String,
    /// 电话（列表视图中通常为空）
    pub phone: String,
    /// 官网URL，可为空
    pub website: String,
    /// 是否有官网
    pub has_website: HasWebsite,
    /// 评分，保留原始文本（可能含本地化格式，如 "4,5"）
    pub rating: String,
    /// 评论数，原始文本
    pub reviews: String,
    /// 地图详情链接
    pub google_maps_link: String,
}

impl ListingRecord {
    pub fn new(business_name: impl Into<String>) -> Self {
        Self {
            business_name: business_name.into(),
            ..Default::default()
        }
    }

    /// 软唯一键 `(business_name, address)`
    pub fn dedup_key(&self) -> (&str, &str) {
        (&self.business_name, &self.address)
    }

    /// 设置官网并同步 `has_website`
    pub fn set_website(&mut self, website: impl Into<String>) {
        self.website = website.into();
        self.has_website = HasWebsite::from_url(&self.website);
    }

    /// 用详情面板数据补全列表视图记录
    ///
    /// 详情面板的非空电话和官网覆盖列表视图的值，列表视图已有的官网
    /// 不会被清空；其余字段只在列表视图留空时补齐。名称和地图链接保持
    /// 列表视图的值。
    pub fn enrich_from(&mut self, detail: &ListingRecord) {
        if !detail.phone.is_empty() {
            self.phone = detail.phone.clone();
        }
        if !detail.website.is_empty() {
            self.set_website(detail.website.clone());
        } else if self.website.is_empty() {
            self.has_website = HasWebsite::No;
        }

        fill_if_empty(&mut self.category, &detail.category);
        fill_if_empty(&mut self.address, &detail.address);
        fill_if_empty(&mut self.rating, &detail.rating);
        fill_if_empty(&mut self.reviews, &detail.reviews);
    }
}

fn fill_if_empty(target: &mut String, source: &str) {
    if target.is_empty() && !source.is_empty() {
        *target = source.to_string();
    }
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use scraper::Html;
use tracing::{debug, info};

use crate::domain::models::listing::ListingRecord;
use crate::maps::error::ScrapeError;
use crate::maps::extraction::list_view::{AnchorFallbackStrategy, CardSelectors, CardStrategy};

/// 列表中提取出的一条记录
///
/// `node_index` 是该记录在策略 `node_selector` 匹配结果中的位置，
/// 用于之后点击同一个元素打开详情
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedListing {
    pub node_index: usize,
    pub record: ListingRecord,
}

/// 一次列表提取的结果
#[derive(Debug, Clone)]
pub struct ListExtraction {
    pub strategy: &'static str,
    pub node_selector: String,
    pub listings: Vec<ExtractedListing>,
}

/// 列表提取策略
pub trait ListingStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// 每条记录对应的可点击元素选择器
    fn node_selector(&self) -> &str;

    fn extract(&self, document: &Html, page_url: &str) -> Vec<ExtractedListing>;
}

/// 按顺序尝试的策略链
///
/// 第一个产出非空结果的策略胜出，后续策略不再执行
pub struct StrategyChain {
    strategies: Vec<Box<dyn ListingStrategy>>,
}

impl StrategyChain {
    pub fn new(strategies: Vec<Box<dyn ListingStrategy>>) -> Self {
        Self { strategies }
    }

    /// 默认链：主卡片结构 → 备用卡片结构 → 地点链接兜底
    pub fn default_chain() -> Result<Self, ScrapeError> {
        Ok(Self::new(vec![
            Box::new(CardStrategy::new("card_primary", &CardSelectors::primary())?),
            Box::new(CardStrategy::new("card_secondary", &CardSelectors::secondary())?),
            Box::new(AnchorFallbackStrategy::new("a[href*='/maps/place/']")?),
        ]))
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// 解析页面并提取列表
    ///
    /// 所有策略都没有结果时返回 `None`
    pub fn extract(&self, html: &str, page_url: &str) -> Option<ListExtraction> {
        let document = Html::parse_document(html);

        for strategy in &self.strategies {
            let listings: Vec<ExtractedListing> = strategy
                .extract(&document, page_url)
                .into_iter()
                .filter(|l| !l.record.business_name.trim().is_empty())
                .collect();

            if listings.is_empty() {
                debug!("Strategy {} found no listings", strategy.name());
                continue;
            }

            info!(
                "Strategy {} extracted {} listings",
                strategy.name(),
                listings.len()
            );
            return Some(ListExtraction {
                strategy: strategy.name(),
                node_selector: strategy.node_selector().to_string(),
                listings,
            });
        }

        None
    }
}

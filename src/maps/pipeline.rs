// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::config::settings::ScraperSettings;
use crate::domain::models::job::{ScrapeMode, ScrapeOptions};
use crate::domain::models::listing::ListingRecord;
use crate::domain::models::progress::ProgressEvent;
use crate::engines::traits::{BrowserLauncher, BrowserPage};
use crate::maps::error::ScrapeError;
use crate::maps::extraction::{DetailPanelExtractor, StrategyChain};
use crate::maps::feed_loader::FeedLoader;
use crate::maps::progress::Progress;
use crate::maps::scroller::{FeedScroller, ScrollPolicy};
use crate::utils::delay::{pause, random_between};

/// 地图商家抓取器
///
/// 一次 `scrape` 调用独占一个浏览器：启动、搜索、滚动到底、提取，
/// 最后无论成功、出错还是 panic 都会关闭浏览器。
pub struct MapsScraper {
    launcher: Arc<dyn BrowserLauncher>,
    settings: Arc<ScraperSettings>,
    chain: StrategyChain,
    detail: DetailPanelExtractor,
}

impl MapsScraper {
    pub fn new(
        launcher: Arc<dyn BrowserLauncher>,
        settings: Arc<ScraperSettings>,
    ) -> Result<Self, ScrapeError> {
        Ok(Self {
            launcher,
            settings,
            chain: StrategyChain::default_chain()?,
            detail: DetailPanelExtractor::new()?,
        })
    }

    pub fn settings(&self) -> &ScraperSettings {
        &self.settings
    }

    /// 执行一次完整抓取
    ///
    /// # 参数
    ///
    /// * `query` - 搜索词
    /// * `options` - 抓取模式和详情补全数量
    /// * `progress` - 进度上报
    ///
    /// # 返回值
    ///
    /// 按列表顺序排列的记录（未去重）。结果列表未出现时返回空集合。
    pub async fn scrape(
        &self,
        query: &str,
        options: &ScrapeOptions,
        progress: &Progress,
    ) -> Result<Vec<ListingRecord>, ScrapeError> {
        progress
            .emit(ProgressEvent::BrowserStarting {
                message: "Launching browser...".to_string(),
            })
            .await;

        let mut page = match self.launcher.launch().await {
            Ok(page) => page,
            Err(e) => {
                error!("Failed to launch browser via {}: {}", self.launcher.name(), e);
                progress
                    .emit(ProgressEvent::Error {
                        message: e.to_string(),
                    })
                    .await;
                return Err(e.into());
            }
        };

        let outcome = AssertUnwindSafe(self.run(page.as_ref(), query, options, progress))
            .catch_unwind()
            .await;

        let result = match outcome {
            Ok(Ok(records)) => Ok(records),
            Ok(Err(ScrapeError::FeedNotFound)) => Ok(Vec::new()),
            Ok(Err(e)) => {
                error!("Scrape for '{}' failed: {}", query, e);
                progress
                    .emit(ProgressEvent::Error {
                        message: e.to_string(),
                    })
                    .await;
                Err(e)
            }
            Err(panic) => {
                let message = panic_message(panic);
                error!("Scrape for '{}' panicked: {}", query, message);
                progress
                    .emit(ProgressEvent::Error {
                        message: message.clone(),
                    })
                    .await;
                Err(ScrapeError::Panicked(message))
            }
        };

        if let Err(e) = page.close().await {
            warn!("Failed to close browser cleanly: {}", e);
        }
        progress
            .emit(ProgressEvent::BrowserClosed {
                message: "Browser closed".to_string(),
            })
            .await;

        result
    }

    async fn run(
        &self,
        page: &dyn BrowserPage,
        query: &str,
        options: &ScrapeOptions,
        progress: &Progress,
    ) -> Result<Vec<ListingRecord>, ScrapeError> {
        FeedLoader::new(page, &self.settings, progress)
            .open(query)
            .await?;

        progress
            .emit(ProgressEvent::Scrolling {
                count: 0,
                message: Some("Scrolling to load all results...".to_string()),
            })
            .await;
        let policy = ScrollPolicy::from(self.settings.as_ref());
        let scrolls = FeedScroller::new(page, &self.settings.feed_selector, policy, progress)
            .scroll_to_end()
            .await?;
        debug!("Feed settled after {} scrolls", scrolls);

        match options.mode {
            ScrapeMode::Fast => self.run_fast(page, options.detail_limit, progress).await,
            ScrapeMode::Detail => self.run_detail(page, progress).await,
        }
    }

    // 快速模式：一次快照提取全部列表，再补全前 detail_limit 条
    async fn run_fast(
        &self,
        page: &dyn BrowserPage,
        detail_limit: usize,
        progress: &Progress,
    ) -> Result<Vec<ListingRecord>, ScrapeError> {
        let html = page.content().await?;
        let page_url = page.current_url().await?;

        let Some(extraction) = self.chain.extract(&html, &page_url) else {
            warn!("No listings could be extracted from the results feed");
            progress
                .emit(ProgressEvent::ListingsFound {
                    total: 0,
                    message: "Found 0 listings".to_string(),
                })
                .await;
            return Ok(Vec::new());
        };

        let total = extraction.listings.len();
        info!("Found {} listings via {}", total, extraction.strategy);
        progress
            .emit(ProgressEvent::ListingsFound {
                total,
                message: format!("Found {} listings", total),
            })
            .await;

        let mut records: Vec<ListingRecord> = Vec::with_capacity(total);
        for (i, listing) in extraction.listings.iter().enumerate() {
            records.push(listing.record.clone());
            progress
                .emit(ProgressEvent::Extracting {
                    current: i + 1,
                    total,
                    collected: records.len(),
                    business: listing.record.business_name.clone(),
                })
                .await;
        }

        let limit = detail_limit.min(total);
        if limit > 0 {
            info!("Enriching first {} listings from detail panels", limit);
        }
        for (i, listing) in extraction.listings.iter().take(limit).enumerate() {
            let name = &listing.record.business_name;
            progress
                .emit(ProgressEvent::Enriching {
                    current: i + 1,
                    total: limit,
                    business: name.clone(),
                })
                .await;

            match self
                .open_detail(page, &extraction.node_selector, listing.node_index)
                .await
            {
                Ok(Some(detail)) if same_business(&detail.business_name, name) => {
                    records[i].enrich_from(&detail)
                }
                Ok(Some(detail)) => warn!(
                    "Detail panel shows '{}' instead of '{}', keeping list data",
                    detail.business_name, name
                ),
                Ok(None) => debug!("Detail panel for '{}' had no name", name),
                Err(e) => warn!("Failed to enrich '{}': {}", name, e),
            }
        }

        Ok(records)
    }

    // 详情模式：逐个点击列表节点，只采用详情面板数据
    async fn run_detail(
        &self,
        page: &dyn BrowserPage,
        progress: &Progress,
    ) -> Result<Vec<ListingRecord>, ScrapeError> {
        let selector = &self.settings.listing_selector;
        let total = page.count(selector).await?;
        info!("Found {} listings to open", total);
        progress
            .emit(ProgressEvent::ListingsFound {
                total,
                message: format!("Found {} listings", total),
            })
            .await;

        let mut records = Vec::new();
        for index in 0..total {
            match self.open_detail(page, selector, index).await {
                Ok(Some(record)) => {
                    let business = record.business_name.clone();
                    records.push(record);
                    progress
                        .emit(ProgressEvent::Extracting {
                            current: index + 1,
                            total,
                            collected: records.len(),
                            business,
                        })
                        .await;
                }
                Ok(None) => debug!("Listing {} had no detail panel name", index),
                Err(e) => warn!("Error on listing {}: {}", index, e),
            }
        }

        Ok(records)
    }

    async fn open_detail(
        &self,
        page: &dyn BrowserPage,
        selector: &str,
        index: usize,
    ) -> Result<Option<ListingRecord>, ScrapeError> {
        page.scroll_into_view(selector, index).await?;
        pause(Duration::from_millis(self.settings.pre_click_ms)).await;
        page.click_nth(selector, index).await?;
        pause(random_between(
            self.settings.click_settle_min_ms,
            self.settings.click_settle_max_ms,
        ))
        .await;

        let html = page.content().await?;
        let page_url = page.current_url().await?;
        Ok(self.detail.extract(&html, &page_url))
    }
}

// 点击未及时打开新面板时，页面上仍是上一个商家的详情
fn same_business(detail_name: &str, listing_name: &str) -> bool {
    detail_name.trim().to_lowercase() == listing_name.trim().to_lowercase()
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

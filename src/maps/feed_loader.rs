// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::Local;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::settings::ScraperSettings;
use crate::domain::models::progress::ProgressEvent;
use crate::engines::traits::BrowserPage;
use crate::maps::error::ScrapeError;
use crate::maps::progress::Progress;
use crate::utils::delay::pause;

/// 构造搜索页地址，查询词中的空白以 `+` 连接
pub fn search_url(base_url: &str, query: &str) -> String {
    let encoded = query
        .split_whitespace()
        .map(|word| urlencoding::encode(word).into_owned())
        .collect::<Vec<_>>()
        .join("+");
    format!("{}/{}", base_url.trim_end_matches('/'), encoded)
}

/// 结果列表加载器
///
/// 打开搜索页、处理同意弹窗，并在限定时间内等待结果列表出现
pub struct FeedLoader<'a> {
    page: &'a dyn BrowserPage,
    settings: &'a ScraperSettings,
    progress: &'a Progress,
}

impl<'a> FeedLoader<'a> {
    pub fn new(
        page: &'a dyn BrowserPage,
        settings: &'a ScraperSettings,
        progress: &'a Progress,
    ) -> Self {
        Self {
            page,
            settings,
            progress,
        }
    }

    /// 打开查询对应的搜索结果
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 结果列表已出现
    /// * `Err(ScrapeError::FeedNotFound)` - 超时仍未出现
    /// * `Err(ScrapeError::Engine)` - 浏览器操作失败
    pub async fn open(&self, query: &str) -> Result<(), ScrapeError> {
        let url = search_url(&self.settings.base_url, query);
        info!("Opening: {}", url);
        self.progress
            .emit(ProgressEvent::Navigating {
                message: format!("Opening Google Maps: {}", query),
            })
            .await;

        self.page.goto(&url).await?;
        pause(Duration::from_millis(self.settings.post_navigation_ms)).await;

        self.dismiss_consent().await;

        self.progress
            .emit(ProgressEvent::Waiting {
                message: "Waiting for results to load...".to_string(),
            })
            .await;

        let found = self
            .page
            .wait_for(&self.settings.feed_selector, self.settings.feed_timeout())
            .await?;
        if found {
            return Ok(());
        }

        warn!("Could not find results panel for query '{}'", query);
        self.progress
            .emit(ProgressEvent::Error {
                message: "Could not find results panel".to_string(),
            })
            .await;
        self.capture_debug_screenshot(query).await;
        Err(ScrapeError::FeedNotFound)
    }

    // 同意弹窗只在部分地区出现，失败不影响后续流程
    async fn dismiss_consent(&self) {
        match self
            .page
            .click_first_present(&self.settings.consent_selectors)
            .await
        {
            Ok(Some(selector)) => {
                info!("Dismissed consent dialog via {}", selector);
                pause(Duration::from_millis(self.settings.post_consent_ms)).await;
            }
            Ok(None) => debug!("No consent dialog present"),
            Err(e) => warn!("Failed to dismiss consent dialog: {}", e),
        }
    }

    async fn capture_debug_screenshot(&self, query: &str) {
        let Some(dir) = &self.settings.debug_screenshot_dir else {
            return;
        };

        let dir = PathBuf::from(dir);
        if let Err(e) = tokio::fs::create_dir_all(&dir).await {
            warn!("Failed to create screenshot directory {}: {}", dir.display(), e);
            return;
        }

        let slug: String = query
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .take(30)
            .collect();
        let path = dir.join(format!(
            "feed_missing_{}_{}.png",
            slug,
            Local::now().format("%Y%m%d_%H%M%S")
        ));

        match self.page.save_screenshot(&path).await {
            Ok(()) => info!("Saved debug screenshot to {}", path.display()),
            Err(e) => warn!("Failed to save debug screenshot: {}", e),
        }
    }
}

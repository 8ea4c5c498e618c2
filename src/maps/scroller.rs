// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::Duration;
use tracing::{info, warn};

use crate::config::settings::ScraperSettings;
use crate::domain::models::progress::ProgressEvent;
use crate::engines::traits::BrowserPage;
use crate::maps::error::ScrapeError;
use crate::maps::progress::Progress;
use crate::utils::delay::{pause, random_between};

/// 滚动收敛策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollPolicy {
    /// 连续多少次高度不变视为到底
    pub stable_checks: u32,
    pub settle_min_ms: u64,
    pub settle_max_ms: u64,
    /// 高度未变化时的额外等待
    pub unchanged_extra_ms: u64,
    pub max_scrolls: Option<u32>,
    pub report_every: u32,
}

impl From<&ScraperSettings> for ScrollPolicy {
    fn from(settings: &ScraperSettings) -> Self {
        Self {
            stable_checks: settings.stable_checks.max(1),
            settle_min_ms: settings.scroll_settle_min_ms,
            settle_max_ms: settings.scroll_settle_max_ms,
            unchanged_extra_ms: settings.unchanged_extra_ms,
            max_scrolls: settings.max_scrolls,
            report_every: settings.scroll_report_every.max(1),
        }
    }
}

/// 结果列表滚动器
///
/// 反复把列表滚到底部并测量内容高度，直到高度连续 `stable_checks`
/// 次不变。除可选的 `max_scrolls` 外没有上限。
pub struct FeedScroller<'a> {
    page: &'a dyn BrowserPage,
    selector: &'a str,
    policy: ScrollPolicy,
    progress: &'a Progress,
}

impl<'a> FeedScroller<'a> {
    pub fn new(
        page: &'a dyn BrowserPage,
        selector: &'a str,
        policy: ScrollPolicy,
        progress: &'a Progress,
    ) -> Self {
        Self {
            page,
            selector,
            policy,
            progress,
        }
    }

    /// 滚动到列表尽头，返回滚动次数
    pub async fn scroll_to_end(&self) -> Result<u32, ScrapeError> {
        info!("Scrolling to load ALL results...");
        let mut last_height = 0u64;
        let mut scroll_count = 0u32;
        let mut unchanged = 0u32;

        loop {
            self.page.scroll_to_bottom(self.selector).await?;
            pause(random_between(
                self.policy.settle_min_ms,
                self.policy.settle_max_ms,
            ))
            .await;

            let height = self.page.scroll_height(self.selector).await?;
            if height == last_height {
                unchanged += 1;
                if unchanged >= self.policy.stable_checks {
                    info!("Reached absolute end after {} scrolls", scroll_count);
                    break;
                }
                pause(Duration::from_millis(self.policy.unchanged_extra_ms)).await;
            } else {
                unchanged = 0;
            }

            last_height = height;
            scroll_count += 1;

            if scroll_count % self.policy.report_every == 0 {
                info!("Scrolled {} times, still loading...", scroll_count);
                self.progress
                    .emit(ProgressEvent::Scrolling {
                        count: scroll_count,
                        message: None,
                    })
                    .await;
            }

            if let Some(max) = self.policy.max_scrolls {
                if scroll_count >= max {
                    warn!("Stopped scrolling at configured cap of {} scrolls", max);
                    break;
                }
            }
        }

        self.progress
            .emit(ProgressEvent::ScrollComplete {
                count: scroll_count,
            })
            .await;
        Ok(scroll_count)
    }
}

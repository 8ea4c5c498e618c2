// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use scraper::{ElementRef, Html, Selector};

use crate::domain::models::listing::ListingRecord;
use crate::maps::error::ScrapeError;
use crate::maps::extraction::dom::{compile, first_value, Probe, Source};

/// 详情面板提取器
///
/// 只在详情面板（不含结果列表的 `div[role='main']`）内查找字段。
/// 每个字段有一组按顺序尝试的候选选择器，缺失字段保持为空
pub struct DetailPanelExtractor {
    panel: Selector,
    feed: Selector,
    name: Vec<Probe>,
    category: Vec<Probe>,
    address: Vec<Probe>,
    phone: Vec<Probe>,
    website: Vec<Probe>,
    rating: Vec<Probe>,
    reviews: Vec<Probe>,
}

impl DetailPanelExtractor {
    pub fn new() -> Result<Self, ScrapeError> {
        Ok(Self {
            panel: compile("div[role='main']")?,
            feed: compile("[role='feed']")?,
            name: vec![
                Probe::new("h1.DUwDvf", Source::Text)?,
                Probe::new("h1", Source::Text)?,
            ],
            category: vec![
                Probe::new("button.DkEaL", Source::Text)?,
                Probe::new("button[jsaction*='category']", Source::Text)?,
            ],
            address: vec![
                Probe::new("button[data-item-id='address']", Source::Text)?,
                Probe::new(
                    "button[data-item-id='address']",
                    Source::AttrAfter("aria-label", "Address: "),
                )?,
            ],
            phone: vec![
                Probe::new("button[data-item-id^='phone:tel:']", Source::Text)?,
                Probe::new(
                    "button[data-item-id^='phone:tel:']",
                    Source::AttrAfter("data-item-id", "phone:tel:"),
                )?,
            ],
            website: vec![
                Probe::new("a[data-item-id='authority']", Source::Attr("href"))?,
                Probe::new("a[aria-label^='Website']", Source::Attr("href"))?,
            ],
            rating: vec![
                Probe::new("span.ceNzKf", Source::Attr("aria-label"))?,
                Probe::new("div.F7nice span[aria-hidden='true']", Source::Text)?,
            ],
            reviews: vec![
                Probe::new("div.F7nice span[aria-label*='review']", Source::Attr("aria-label"))?,
                Probe::new("div.F7nice", Source::Text)?,
            ],
        })
    }

    /// 从详情面板中提取一条记录
    ///
    /// 没有打开的详情面板或面板内找不到名称时返回 `None`；
    /// `page_url` 作为该记录的地图链接
    pub fn extract(&self, html: &str, page_url: &str) -> Option<ListingRecord> {
        let document = Html::parse_document(html);
        document
            .select(&self.panel)
            .filter(|panel| panel.select(&self.feed).next().is_none())
            .find_map(|panel| self.extract_panel(&panel, page_url))
    }

    fn extract_panel(&self, panel: &ElementRef, page_url: &str) -> Option<ListingRecord> {
        let name = first_value(panel, &self.name);
        if name.is_empty() {
            return None;
        }

        let mut record = ListingRecord::new(name);
        record.category = first_value(panel, &self.category);
        record.address = first_value(panel, &self.address);
        record.phone = first_value(panel, &self.phone);
        record.set_website(first_value(panel, &self.website));
        record.rating = first_value(panel, &self.rating);
        record.reviews = first_value(panel, &self.reviews);
        record.google_maps_link = page_url.to_string();
        Some(record)
    }
}

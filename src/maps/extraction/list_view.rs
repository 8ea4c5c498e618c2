// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::domain::models::listing::{HasWebsite, ListingRecord};
use crate::maps::error::ScrapeError;
use crate::maps::extraction::dom::{
    absolute_url, clean_text, compile, element_text, first_value, rating_value, review_count,
    Probe, Source,
};
use crate::maps::extraction::strategy::{ExtractedListing, ListingStrategy};

// 行首是 "4.5(120)" 这样的评分摘要
static RATING_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(?:[.,]\d+)?\s*\(").expect("valid regex"));
// 营业状态行
static STATUS_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:open|opens|closed|closes|temporarily closed|permanently closed)\b")
        .expect("valid regex")
});

const CURRENCY: [char; 6] = ['$', '€', '£', '¥', '₹', '₩'];

/// 卡片结构的选择器组
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSelectors {
    pub container: String,
    pub link: String,
    pub name: String,
    pub rating: String,
    pub reviews: String,
    pub info_row: String,
    pub website: String,
}

impl CardSelectors {
    /// 当前结果卡片的结构
    pub fn primary() -> Self {
        Self {
            container: "div[role='feed'] div.Nv2PK".to_string(),
            link: "a.hfpxzc".to_string(),
            name: "div.qBF1Pd".to_string(),
            rating: "span.MW4etd".to_string(),
            reviews: "span.UY7F9".to_string(),
            info_row: "div.W4Efsd".to_string(),
            website: "a.lcr4fd, a[data-value='Website']".to_string(),
        }
    }

    /// 不依赖混淆类名的备用结构
    pub fn secondary() -> Self {
        Self {
            container: "div[role='feed'] > div > div[jsaction]".to_string(),
            link: "a[href*='/maps/place/']".to_string(),
            name: "div.fontHeadlineSmall".to_string(),
            rating: "span[role='img'][aria-label]".to_string(),
            reviews: "span[aria-label*='eview']".to_string(),
            info_row: "div.fontBodyMedium > div".to_string(),
            website: "a[data-value='Website'], a[aria-label*='ebsite']".to_string(),
        }
    }
}

/// 基于结果卡片的提取策略
pub struct CardStrategy {
    name: &'static str,
    node_selector: String,
    container: Selector,
    link: Selector,
    info_row: Selector,
    title: Vec<Probe>,
    rating: Vec<Probe>,
    reviews: Vec<Probe>,
    website: Vec<Probe>,
}

impl CardStrategy {
    pub fn new(name: &'static str, selectors: &CardSelectors) -> Result<Self, ScrapeError> {
        Ok(Self {
            name,
            node_selector: selectors.container.clone(),
            container: compile(&selectors.container)?,
            link: compile(&selectors.link)?,
            info_row: compile(&selectors.info_row)?,
            title: vec![
                Probe::new(&selectors.name, Source::Text)?,
                Probe::new(&selectors.link, Source::Attr("aria-label"))?,
            ],
            rating: vec![
                Probe::new(&selectors.rating, Source::Text)?,
                Probe::new(&selectors.rating, Source::Attr("aria-label"))?,
            ],
            reviews: vec![
                Probe::new(&selectors.reviews, Source::Text)?,
                Probe::new(&selectors.reviews, Source::Attr("aria-label"))?,
            ],
            website: vec![Probe::new(&selectors.website, Source::Attr("href"))?],
        })
    }

    fn parse_card(&self, card: &ElementRef, page_url: &str) -> Option<ListingRecord> {
        let name = first_value(card, &self.title);
        if name.is_empty() {
            return None;
        }

        let mut record = ListingRecord::new(name);
        record.google_maps_link = card
            .select(&self.link)
            .find_map(|a| a.value().attr("href"))
            .map(|href| absolute_url(page_url, href))
            .unwrap_or_default();
        record.rating = rating_value(&first_value(card, &self.rating));
        record.reviews = review_count(&first_value(card, &self.reviews));

        let (category, address) = category_and_address(&self.leaf_rows(card));
        record.category = category;
        record.address = address;

        // 卡片上有没有网站按钮可以直接判断
        let website = first_value(card, &self.website);
        record.has_website = if website.is_empty() {
            HasWebsite::No
        } else {
            HasWebsite::Yes
        };
        record.website = website;

        Some(record)
    }

    // 只取不再嵌套信息行的叶子行
    fn leaf_rows(&self, card: &ElementRef) -> Vec<String> {
        card.select(&self.info_row)
            .filter(|row| !row.select(&self.info_row).any(|inner| inner.id() != row.id()))
            .map(|row| element_text(&row))
            .filter(|text| !text.is_empty())
            .collect()
    }
}

impl ListingStrategy for CardStrategy {
    fn name(&self) -> &'static str {
        self.name
    }

    fn node_selector(&self) -> &str {
        &self.node_selector
    }

    fn extract(&self, document: &Html, page_url: &str) -> Vec<ExtractedListing> {
        document
            .select(&self.container)
            .enumerate()
            .filter_map(|(node_index, card)| {
                self.parse_card(&card, page_url)
                    .map(|record| ExtractedListing { node_index, record })
            })
            .collect()
    }
}

fn is_price(segment: &str) -> bool {
    segment.chars().any(|c| CURRENCY.contains(&c)) && !segment.chars().any(char::is_alphabetic)
}

/// 从信息行中解析类别和地址
///
/// 信息行形如 "Cafe · $$ · 12 Main St"：第一段是类别，最后一段是地址。
/// 评分摘要行和营业状态行跳过。
pub fn category_and_address(lines: &[String]) -> (String, String) {
    for line in lines {
        let segments: Vec<String> = line
            .split(['·', '⋅'])
            .map(clean_text)
            .filter(|s| !s.is_empty() && !is_price(s))
            .collect();

        let Some(first) = segments.first() else {
            continue;
        };
        if RATING_LINE.is_match(first) || STATUS_LINE.is_match(first) {
            continue;
        }

        let address = if segments.len() > 1 {
            segments[segments.len() - 1].clone()
        } else {
            String::new()
        };
        return (first.clone(), address);
    }

    (String::new(), String::new())
}

/// 兜底策略：页面上所有指向地点页的链接
///
/// 只能拿到名称和链接，网站状态未知，留给详情补全
pub struct AnchorFallbackStrategy {
    node_selector: String,
    anchors: Selector,
}

impl AnchorFallbackStrategy {
    pub fn new(selector: &str) -> Result<Self, ScrapeError> {
        Ok(Self {
            node_selector: selector.to_string(),
            anchors: compile(selector)?,
        })
    }
}

impl ListingStrategy for AnchorFallbackStrategy {
    fn name(&self) -> &'static str {
        "place_anchor"
    }

    fn node_selector(&self) -> &str {
        &self.node_selector
    }

    fn extract(&self, document: &Html, page_url: &str) -> Vec<ExtractedListing> {
        document
            .select(&self.anchors)
            .enumerate()
            .filter_map(|(node_index, anchor)| {
                let name = anchor
                    .value()
                    .attr("aria-label")
                    .map(clean_text)
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| element_text(&anchor));
                if name.is_empty() {
                    return None;
                }

                let mut record = ListingRecord::new(name);
                record.google_maps_link = anchor
                    .value()
                    .attr("href")
                    .map(|href| absolute_url(page_url, href))
                    .unwrap_or_default();
                Some(ExtractedListing { node_index, record })
            })
            .collect()
    }
}

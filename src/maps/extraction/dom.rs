// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};
use url::Url;

use crate::maps::error::ScrapeError;

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d[\d.,\u{a0}\u{202f}]*").expect("valid regex"));
static REVIEW_COUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d[\d.,\u{a0}\u{202f}]*)\s*(?:reviews?|avis|rezensionen|reseñas)").expect("valid regex"));

/// 编译CSS选择器
pub fn compile(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::InvalidSelector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

/// 清理页面文本
///
/// 去掉图标字体使用的私有区字符，合并空白
pub fn clean_text(raw: &str) -> String {
    raw.chars()
        .filter(|c| !('\u{e000}'..='\u{f8ff}').contains(c))
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn element_text(element: &ElementRef) -> String {
    clean_text(&element.text().collect::<String>())
}

/// 相对链接补全为绝对链接，无法解析时原样返回
pub fn absolute_url(base: &str, href: &str) -> String {
    match Url::parse(base).and_then(|b| b.join(href)) {
        Ok(url) => url.to_string(),
        Err(_) => href.to_string(),
    }
}

/// 字段取值来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Text,
    Attr(&'static str),
    /// 属性值去掉前缀，例如 `phone:tel:+1555...`
    AttrAfter(&'static str, &'static str),
}

/// 一个候选选择器及其取值方式
pub struct Probe {
    selector: Selector,
    source: Source,
}

impl Probe {
    pub fn new(css: &str, source: Source) -> Result<Self, ScrapeError> {
        Ok(Self {
            selector: compile(css)?,
            source,
        })
    }

    fn read(&self, element: &ElementRef) -> Option<String> {
        let value = match self.source {
            Source::Text => element_text(element),
            Source::Attr(name) => clean_text(element.value().attr(name)?),
            Source::AttrAfter(name, prefix) => {
                clean_text(element.value().attr(name)?.strip_prefix(prefix)?)
            }
        };
        (!value.is_empty()).then_some(value)
    }

    fn first_in(&self, root: &ElementRef) -> Option<String> {
        root.select(&self.selector)
            .find_map(|element| self.read(&element))
    }
}

/// 按顺序尝试候选选择器，返回第一个非空值
pub fn first_value(root: &ElementRef, probes: &[Probe]) -> String {
    probes
        .iter()
        .find_map(|probe| probe.first_in(root))
        .unwrap_or_default()
}

/// 规范化评分文本
///
/// 纯数字（含本地化小数点）原样保留；"4.5 stars" 之类取第一个数字
pub fn rating_value(raw: &str) -> String {
    if raw.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return raw.to_string();
    }
    NUMBER
        .find(raw)
        .map(|m| m.as_str().trim_end_matches([',', '.']).to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// 规范化评论数文本："(1,234)" → "1,234"，"1,234 reviews" → "1,234"
pub fn review_count(raw: &str) -> String {
    if let Some(caps) = REVIEW_COUNT.captures(raw) {
        return caps[1].trim().to_string();
    }
    raw.trim_matches(|c: char| c == '(' || c == ')' || c.is_whitespace())
        .to_string()
}

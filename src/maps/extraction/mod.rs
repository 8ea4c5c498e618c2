// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 页面快照解析
//!
//! 只处理已取回的HTML，不接触浏览器

pub mod detail_view;
pub mod dom;
pub mod list_view;
pub mod strategy;

pub use detail_view::DetailPanelExtractor;
pub use strategy::{ExtractedListing, ListExtraction, ListingStrategy, StrategyChain};

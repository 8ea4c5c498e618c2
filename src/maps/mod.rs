// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 地图搜索结果抓取
//!
//! `feed_loader` 打开搜索页，`scroller` 把结果列表滚到底，
//! `extraction` 解析列表和详情面板，`pipeline` 串起整个流程。

pub mod error;
pub mod extraction;
pub mod feed_loader;
pub mod pipeline;
pub mod progress;
pub mod scroller;

pub use error::ScrapeError;
pub use pipeline::MapsScraper;
pub use progress::{Progress, ProgressSink};

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// 浏览器引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 浏览器启动或连接失败
    #[error("Browser launch failed: {0}")]
    LaunchFailed(String),
    /// 页面导航失败
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),
    /// 元素不存在
    #[error("Element not found: {0}")]
    ElementNotFound(String),
    /// 页面脚本执行失败
    #[error("Script evaluation failed: {0}")]
    ScriptFailed(String),
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

/// 浏览器页面能力
///
/// 抓取流程只通过此接口驱动页面，每个任务独占一个实例。
#[async_trait]
pub trait BrowserPage: Send + Sync {
    /// 导航到指定URL并等待加载
    async fn goto(&self, url: &str) -> Result<(), EngineError>;

    /// 在超时内等待元素出现，返回是否出现
    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<bool, EngineError>;

    /// 按顺序探测选择器，点击第一个存在的元素，返回命中的选择器
    async fn click_first_present(&self, selectors: &[String])
        -> Result<Option<String>, EngineError>;

    /// 将容器滚动到当前底部
    async fn scroll_to_bottom(&self, selector: &str) -> Result<(), EngineError>;

    /// 容器当前的内容高度
    async fn scroll_height(&self, selector: &str) -> Result<u64, EngineError>;

    /// 匹配选择器的元素数量
    async fn count(&self, selector: &str) -> Result<usize, EngineError>;

    /// 将第 `index` 个匹配元素滚动到可见区域
    async fn scroll_into_view(&self, selector: &str, index: usize) -> Result<(), EngineError>;

    /// 点击第 `index` 个匹配元素
    async fn click_nth(&self, selector: &str, index: usize) -> Result<(), EngineError>;

    /// 当前页面完整HTML
    async fn content(&self) -> Result<String, EngineError>;

    /// 当前页面URL
    async fn current_url(&self) -> Result<String, EngineError>;

    /// 保存整页截图
    async fn save_screenshot(&self, path: &Path) -> Result<(), EngineError>;

    /// 释放浏览器资源，重复调用无副作用
    async fn close(&mut self) -> Result<(), EngineError>;
}

/// 浏览器启动器
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    /// 启动一个新的浏览器实例并返回其页面
    async fn launch(&self) -> Result<Box<dyn BrowserPage>, EngineError>;

    /// 启动器名称
    fn name(&self) -> &'static str;
}

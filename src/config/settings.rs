// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::models::job::{ScrapeMode, ScrapeOptions};

/// 应用程序配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 浏览器配置
    pub browser: BrowserSettings,
    /// 抓取流程配置
    #[serde(default)]
    pub scraper: ScraperSettings,
    /// 任务表配置
    pub jobs: JobSettings,
    /// 存储配置
    pub storage: StorageSettings,
    /// 指标配置
    pub metrics: MetricsSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 浏览器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    /// 是否无头模式
    pub headless: bool,
    /// 远程调试地址，设置后连接已有的 Chrome 而不是启动新进程
    pub remote_url: Option<String>,
    /// CDP 请求超时（秒）
    pub request_timeout_secs: u64,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            remote_url: None,
            request_timeout_secs: 30,
        }
    }
}

/// 抓取流程配置设置
///
/// 所有延迟以毫秒计。选择器针对目标站点当前的页面结构。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperSettings {
    /// 搜索页基础地址，查询词拼接在其后
    pub base_url: String,
    /// 结果列表容器选择器
    pub feed_selector: String,
    /// 详情模式下逐个点击的列表节点选择器
    pub listing_selector: String,
    /// 同意弹窗按钮选择器，按顺序探测
    pub consent_selectors: Vec<String>,
    /// 等待结果列表出现的超时（秒）
    pub feed_timeout_secs: u64,
    /// 打开搜索页后的固定等待
    pub post_navigation_ms: u64,
    /// 点击同意按钮后的等待
    pub post_consent_ms: u64,
    pub scroll_settle_min_ms: u64,
    pub scroll_settle_max_ms: u64,
    /// 高度未变化时额外等待
    pub unchanged_extra_ms: u64,
    /// 连续多少次高度不变视为滚动完成
    pub stable_checks: u32,
    /// 滚动次数上限，默认不限制
    pub max_scrolls: Option<u32>,
    /// 每滚动多少次上报一次进度
    pub scroll_report_every: u32,
    pub pre_click_ms: u64,
    pub click_settle_min_ms: u64,
    pub click_settle_max_ms: u64,
    pub default_mode: ScrapeMode,
    /// 快速模式详情补全条数
    pub detail_limit: usize,
    /// 找不到结果列表时保存截图的目录，为空则不保存
    pub debug_screenshot_dir: Option<String>,
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.google.com/maps/search".to_string(),
            feed_selector: "div[role='feed']".to_string(),
            listing_selector: "div[role='feed'] > div > div > a".to_string(),
            consent_selectors: vec![
                "button[aria-label='Accept all']".to_string(),
                "button#L2AGLb".to_string(),
                "form[action*='consent'] button".to_string(),
                "button[aria-label='Reject all']".to_string(),
            ],
            feed_timeout_secs: 15,
            post_navigation_ms: 4000,
            post_consent_ms: 1500,
            scroll_settle_min_ms: 1500,
            scroll_settle_max_ms: 2500,
            unchanged_extra_ms: 1000,
            stable_checks: 5,
            max_scrolls: None,
            scroll_report_every: 5,
            pre_click_ms: 300,
            click_settle_min_ms: 1200,
            click_settle_max_ms: 2000,
            default_mode: ScrapeMode::Fast,
            detail_limit: 10,
            debug_screenshot_dir: None,
        }
    }
}

impl ScraperSettings {
    pub fn feed_timeout(&self) -> Duration {
        Duration::from_secs(self.feed_timeout_secs)
    }

    /// 请求未指定时使用的抓取选项
    pub fn default_options(&self) -> ScrapeOptions {
        ScrapeOptions {
            mode: self.default_mode,
            detail_limit: self.detail_limit,
        }
    }
}

/// 任务表配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct JobSettings {
    /// 每个任务保留的日志条数
    pub log_capacity: usize,
    /// 状态接口返回的日志条数
    pub log_tail: usize,
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            log_capacity: 200,
            log_tail: 20,
        }
    }
}

/// 存储配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// CSV 输出目录
    pub output_dir: String,
}

/// 指标配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    pub enabled: bool,
    /// Prometheus 导出地址
    pub listen_addr: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次叠加默认值、`config/default`、`config/{APP_ENVIRONMENT}`
    /// 和 `LEADRS__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("browser.headless", true)?
            .set_default("browser.request_timeout_secs", 30)?
            .set_default("jobs.log_capacity", 200)?
            .set_default("jobs.log_tail", 20)?
            .set_default("storage.output_dir", "leads")?
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("LEADRS").separator("__"));

        builder.build()?.try_deserialize()
    }
}

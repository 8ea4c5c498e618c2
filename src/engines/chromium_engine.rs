// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::BrowserSettings;
use crate::engines::traits::{BrowserLauncher, BrowserPage, EngineError};
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(250);

// Hide the automation flag before any page script runs.
const WEBDRIVER_MASK: &str =
    "Object.defineProperty(navigator, 'webdriver', { get: () => undefined });";

/// 将选择器编码为JS字符串字面量
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Chromium 启动器
///
/// 基于chromiumoxide，每次调用 `launch` 都得到一个独立的浏览器进程
/// （或远程实例上的独立页面）
pub struct ChromiumLauncher {
    settings: BrowserSettings,
}

impl ChromiumLauncher {
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }

    async fn start_browser(&self) -> Result<(Browser, chromiumoxide::Handler), EngineError> {
        if let Some(url) = &self.settings.remote_url {
            info!("Connecting to remote Chrome instance at: {}", url);
            return Browser::connect(url.as_str()).await.map_err(|e| {
                EngineError::LaunchFailed(format!("Failed to connect to remote Chrome: {}", e))
            });
        }

        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(Duration::from_secs(self.settings.request_timeout_secs))
            .window_size(1920, 1080)
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-infobars")
            .arg("--disable-blink-features=AutomationControlled");

        if !self.settings.headless {
            builder = builder.with_head();
        }

        let config = builder.build().map_err(EngineError::LaunchFailed)?;
        Browser::launch(config)
            .await
            .map_err(|e| EngineError::LaunchFailed(e.to_string()))
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserPage>, EngineError> {
        let (browser, mut handler) = self.start_browser().await?;

        // Spawn a handler to process browser events
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let mut session = ChromiumPage {
            browser,
            page: None,
            handler_task,
            owns_process: self.settings.remote_url.is_none(),
            closed: false,
        };

        match open_page(&session.browser).await {
            Ok(page) => {
                session.page = Some(page);
                Ok(Box::new(session))
            }
            Err(e) => {
                if let Err(close_err) = session.close().await {
                    warn!("Failed to release browser after page error: {}", close_err);
                }
                Err(e)
            }
        }
    }

    fn name(&self) -> &'static str {
        "chromium"
    }
}

async fn open_page(browser: &Browser) -> Result<Page, EngineError> {
    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|e| EngineError::LaunchFailed(e.to_string()))?;
    page.evaluate_on_new_document(AddScriptToEvaluateOnNewDocumentParams::new(WEBDRIVER_MASK))
        .await
        .map_err(|e| EngineError::ScriptFailed(e.to_string()))?;
    Ok(page)
}

/// 单个任务独占的浏览器页面
pub struct ChromiumPage {
    browser: Browser,
    page: Option<Page>,
    handler_task: JoinHandle<()>,
    owns_process: bool,
    closed: bool,
}

impl ChromiumPage {
    fn page(&self) -> Result<&Page, EngineError> {
        self.page
            .as_ref()
            .ok_or_else(|| EngineError::Other("Page is closed".to_string()))
    }

    async fn evaluate<T: serde::de::DeserializeOwned>(&self, script: String) -> Result<T, EngineError> {
        self.page()?
            .evaluate(script)
            .await
            .map_err(|e| EngineError::ScriptFailed(e.to_string()))?
            .into_value::<T>()
            .map_err(|e| EngineError::ScriptFailed(e.to_string()))
    }

    async fn nth_element(
        &self,
        selector: &str,
        index: usize,
    ) -> Result<chromiumoxide::Element, EngineError> {
        let mut elements = self
            .page()?
            .find_elements(selector)
            .await
            .map_err(|e| EngineError::ElementNotFound(format!("{}: {}", selector, e)))?;
        if index >= elements.len() {
            return Err(EngineError::ElementNotFound(format!(
                "{}[{}] (only {} present)",
                selector,
                index,
                elements.len()
            )));
        }
        Ok(elements.swap_remove(index))
    }
}

#[async_trait]
impl BrowserPage for ChromiumPage {
    async fn goto(&self, url: &str) -> Result<(), EngineError> {
        self.page()?
            .goto(url)
            .await
            .map_err(|e| EngineError::NavigationFailed(e.to_string()))?;
        Ok(())
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<bool, EngineError> {
        let page = self.page()?;
        let deadline = Instant::now() + timeout;
        loop {
            if page.find_element(selector).await.is_ok() {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(WAIT_POLL_INTERVAL).await;
        }
    }

    async fn click_first_present(
        &self,
        selectors: &[String],
    ) -> Result<Option<String>, EngineError> {
        let page = self.page()?;
        for selector in selectors {
            if let Ok(element) = page.find_element(selector.as_str()).await {
                element
                    .click()
                    .await
                    .map_err(|e| EngineError::Other(format!("Click failed: {}", e)))?;
                return Ok(Some(selector.clone()));
            }
        }
        Ok(None)
    }

    async fn scroll_to_bottom(&self, selector: &str) -> Result<(), EngineError> {
        let script = format!(
            "(() => {{ const el = document.querySelector({}); if (!el) return false; el.scrollTop = el.scrollHeight; return true; }})()",
            js_string(selector)
        );
        if self.evaluate::<bool>(script).await? {
            Ok(())
        } else {
            Err(EngineError::ElementNotFound(selector.to_string()))
        }
    }

    async fn scroll_height(&self, selector: &str) -> Result<u64, EngineError> {
        let script = format!(
            "(() => {{ const el = document.querySelector({}); return el ? el.scrollHeight : null; }})()",
            js_string(selector)
        );
        self.evaluate::<Option<u64>>(script)
            .await?
            .ok_or_else(|| EngineError::ElementNotFound(selector.to_string()))
    }

    async fn count(&self, selector: &str) -> Result<usize, EngineError> {
        let elements = self
            .page()?
            .find_elements(selector)
            .await
            .map_err(|e| EngineError::Other(e.to_string()))?;
        Ok(elements.len())
    }

    async fn scroll_into_view(&self, selector: &str, index: usize) -> Result<(), EngineError> {
        self.nth_element(selector, index)
            .await?
            .scroll_into_view()
            .await
            .map_err(|e| EngineError::Other(format!("Scroll into view failed: {}", e)))?;
        Ok(())
    }

    async fn click_nth(&self, selector: &str, index: usize) -> Result<(), EngineError> {
        self.nth_element(selector, index)
            .await?
            .click()
            .await
            .map_err(|e| EngineError::Other(format!("Click failed: {}", e)))?;
        Ok(())
    }

    async fn content(&self) -> Result<String, EngineError> {
        self.page()?
            .content()
            .await
            .map_err(|e| EngineError::Other(e.to_string()))
    }

    async fn current_url(&self) -> Result<String, EngineError> {
        let url = self
            .page()?
            .url()
            .await
            .map_err(|e| EngineError::Other(e.to_string()))?;
        Ok(url.unwrap_or_default())
    }

    async fn save_screenshot(&self, path: &Path) -> Result<(), EngineError> {
        let params = ScreenshotParams::builder().full_page(true).build();
        self.page()?
            .save_screenshot(params, path)
            .await
            .map_err(|e| EngineError::Other(format!("Page screenshot failed: {}", e)))?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), EngineError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let mut result = Ok(());
        if self.owns_process {
            if let Err(e) = self.browser.close().await {
                result = Err(EngineError::Other(format!("Failed to close browser: {}", e)));
            }
            if let Err(e) = self.browser.wait().await {
                debug!("Browser process wait failed: {}", e);
            }
        } else if let Some(page) = self.page.take() {
            // Remote browsers outlive the job; only our tab goes away.
            if let Err(e) = page.close().await {
                result = Err(EngineError::Other(format!("Failed to close page: {}", e)));
            }
        }

        self.page = None;
        self.handler_task.abort();
        result
    }
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use leadrs::engines::traits::{BrowserLauncher, BrowserPage, EngineError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;

/// 模拟的搜索结果页
///
/// 列表卡片使用主卡片结构；偶数序号的卡片带网站按钮。
/// 点击第 `i` 个卡片后页面会附带该商家的详情面板。
#[derive(Default)]
pub struct FakeMapsScenario {
    pub listings: usize,
    /// 在列表末尾重复前几张卡片
    pub duplicates: usize,
    pub feed_missing: bool,
    pub fail_launch: bool,
    pub fail_content: bool,
    pub panic_on_scroll: bool,
    pub failing_clicks: HashSet<usize>,
    /// 点击成功但面板不切换，页面仍显示上一个详情
    pub unresponsive_clicks: HashSet<usize>,
    /// 页面上存在的同意按钮选择器
    pub consent_button: Option<String>,
    pub failing_consent: bool,
    /// 设置后 `launch` 需要先取得许可
    pub launch_gate: Option<Arc<Semaphore>>,
}

impl FakeMapsScenario {
    pub fn with_listings(listings: usize) -> Self {
        Self {
            listings,
            ..Default::default()
        }
    }

    fn card_index(&self, node: usize) -> usize {
        if node < self.listings {
            node
        } else {
            node - self.listings
        }
    }

    fn feed_html(&self) -> String {
        let cards: String = (0..self.listings + self.duplicates)
            .map(|node| primary_card(self.card_index(node)))
            .collect();
        format!(r#"<div role="feed"><div>{}</div></div>"#, cards)
    }
}

pub fn business_name(i: usize) -> String {
    format!("Business {}", i)
}

pub fn list_website(i: usize) -> String {
    format!("https://list{}.example.com/", i)
}

pub fn detail_website(i: usize) -> String {
    format!("https://business{}.example.com/", i)
}

pub fn detail_phone(i: usize) -> String {
    format!("(555) 000-{:04}", i)
}

fn primary_card(i: usize) -> String {
    let website = if i % 2 == 0 {
        format!(
            r#"<a class="lcr4fd" data-value="Website" href="{}"></a>"#,
            list_website(i)
        )
    } else {
        String::new()
    };
    format!(
        r#"<div class="Nv2PK">
             <a class="hfpxzc" aria-label="{name}" href="/maps/place/Business+{i}"></a>
             <div class="qBF1Pd">{name}</div>
             <div class="W4Efsd"><span class="MW4etd">4.{i}</span><span class="UY7F9">({i}0)</span></div>
             <div class="W4Efsd"><div class="W4Efsd"><span>Dentist</span><span> · </span><span>{i} Main St</span></div></div>
             {website}
           </div>"#,
        name = business_name(i),
    )
}

fn detail_panel(i: usize) -> String {
    format!(
        r#"<div role="main">
             <h1 class="DUwDvf">{name}</h1>
             <button class="DkEaL">Dentist</button>
             <button data-item-id="address"><div>{i} Main St</div></button>
             <a data-item-id="authority" href="{site}"></a>
             <button data-item-id="phone:tel:+1555000{i:04}"><div>{phone}</div></button>
           </div>"#,
        name = business_name(i),
        site = detail_website(i),
        phone = detail_phone(i),
    )
}

/// 测试可观察的浏览器状态
#[derive(Default)]
pub struct FakeBrowserState {
    pub launches: AtomicUsize,
    pub closed: AtomicBool,
    pub scrolls: AtomicUsize,
    pub clicks: Mutex<Vec<usize>>,
    pub visited: Mutex<Vec<String>>,
    /// 按发生顺序记录的页面操作
    pub actions: Mutex<Vec<String>>,
    pub screenshots: Mutex<Vec<PathBuf>>,
}

impl FakeBrowserState {
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn clicks(&self) -> Vec<usize> {
        self.clicks.lock().unwrap().clone()
    }

    pub fn actions(&self) -> Vec<String> {
        self.actions.lock().unwrap().clone()
    }

    fn record(&self, action: impl Into<String>) {
        self.actions.lock().unwrap().push(action.into());
    }
}

pub struct FakeLauncher {
    scenario: Arc<FakeMapsScenario>,
    pub state: Arc<FakeBrowserState>,
}

impl FakeLauncher {
    pub fn new(scenario: FakeMapsScenario) -> Self {
        Self {
            scenario: Arc::new(scenario),
            state: Arc::new(FakeBrowserState::default()),
        }
    }
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserPage>, EngineError> {
        if let Some(gate) = &self.scenario.launch_gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|e| EngineError::LaunchFailed(e.to_string()))?;
            permit.forget();
        }
        if self.scenario.fail_launch {
            return Err(EngineError::LaunchFailed("no chrome binary".to_string()));
        }

        self.state.launches.fetch_add(1, Ordering::SeqCst);
        self.state.closed.store(false, Ordering::SeqCst);
        Ok(Box::new(FakeMapsPage {
            scenario: self.scenario.clone(),
            state: self.state.clone(),
            focused: Mutex::new(None),
        }))
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

pub struct FakeMapsPage {
    scenario: Arc<FakeMapsScenario>,
    state: Arc<FakeBrowserState>,
    focused: Mutex<Option<usize>>,
}

impl FakeMapsPage {
    fn node_count(&self) -> usize {
        self.scenario.listings + self.scenario.duplicates
    }
}

#[async_trait]
impl BrowserPage for FakeMapsPage {
    async fn goto(&self, url: &str) -> Result<(), EngineError> {
        self.state.visited.lock().unwrap().push(url.to_string());
        self.state.record("goto");
        Ok(())
    }

    async fn wait_for(&self, _selector: &str, _timeout: Duration) -> Result<bool, EngineError> {
        self.state.record("wait_for");
        Ok(!self.scenario.feed_missing)
    }

    async fn click_first_present(
        &self,
        selectors: &[String],
    ) -> Result<Option<String>, EngineError> {
        if self.scenario.failing_consent {
            self.state.record("consent_failed");
            return Err(EngineError::Other("consent frame detached".to_string()));
        }
        let present = self
            .scenario
            .consent_button
            .as_ref()
            .filter(|button| selectors.contains(button));
        if let Some(button) = present {
            self.state.record(format!("click:{}", button));
        }
        Ok(present.cloned())
    }

    async fn scroll_to_bottom(&self, _selector: &str) -> Result<(), EngineError> {
        if self.scenario.panic_on_scroll {
            panic!("scroll handler exploded");
        }
        self.state.scrolls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn scroll_height(&self, _selector: &str) -> Result<u64, EngineError> {
        let scrolls = self.state.scrolls.load(Ordering::SeqCst) as u64;
        Ok(scrolls.min(3) * 1000)
    }

    async fn count(&self, _selector: &str) -> Result<usize, EngineError> {
        Ok(self.node_count())
    }

    async fn scroll_into_view(&self, selector: &str, index: usize) -> Result<(), EngineError> {
        if index >= self.node_count() {
            return Err(EngineError::ElementNotFound(format!("{}[{}]", selector, index)));
        }
        Ok(())
    }

    async fn click_nth(&self, selector: &str, index: usize) -> Result<(), EngineError> {
        self.state.clicks.lock().unwrap().push(index);
        if self.scenario.failing_clicks.contains(&index) {
            return Err(EngineError::Other(format!("Click failed: {}[{}]", selector, index)));
        }
        if !self.scenario.unresponsive_clicks.contains(&index) {
            *self.focused.lock().unwrap() = Some(self.scenario.card_index(index));
        }
        Ok(())
    }

    async fn content(&self) -> Result<String, EngineError> {
        if self.scenario.fail_content {
            return Err(EngineError::Other("renderer crashed".to_string()));
        }
        let panel = self
            .focused
            .lock()
            .unwrap()
            .map(detail_panel)
            .unwrap_or_default();
        Ok(format!(
            "<html><body>{}{}</body></html>",
            self.scenario.feed_html(),
            panel
        ))
    }

    async fn current_url(&self) -> Result<String, EngineError> {
        let focused = *self.focused.lock().unwrap();
        Ok(match focused {
            Some(i) => format!("https://www.google.com/maps/place/Business+{}", i),
            None => self
                .state
                .visited
                .lock()
                .unwrap()
                .last()
                .cloned()
                .unwrap_or_default(),
        })
    }

    async fn save_screenshot(&self, path: &Path) -> Result<(), EngineError> {
        self.state.screenshots.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    async fn close(&mut self) -> Result<(), EngineError> {
        self.state.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

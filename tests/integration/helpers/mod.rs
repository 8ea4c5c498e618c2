// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod fake_browser;

use async_trait::async_trait;
use leadrs::application::use_cases::scrape_job::ScrapeJobService;
use leadrs::config::settings::{JobSettings, ScraperSettings};
use leadrs::domain::models::progress::ProgressEvent;
use leadrs::infrastructure::repositories::job_repo_impl::InMemoryJobRepository;
use leadrs::infrastructure::storage::CsvExporter;
use leadrs::maps::{MapsScraper, ProgressSink};
use std::path::Path;
use std::sync::{Arc, Mutex};

use fake_browser::{FakeLauncher, FakeMapsScenario};

/// 去掉所有等待的抓取配置
pub fn instant_settings() -> ScraperSettings {
    ScraperSettings {
        feed_timeout_secs: 0,
        post_navigation_ms: 0,
        post_consent_ms: 0,
        scroll_settle_min_ms: 0,
        scroll_settle_max_ms: 0,
        unchanged_extra_ms: 0,
        pre_click_ms: 0,
        click_settle_min_ms: 0,
        click_settle_max_ms: 0,
        ..ScraperSettings::default()
    }
}

pub fn fake_scraper(scenario: FakeMapsScenario) -> (MapsScraper, Arc<FakeLauncher>) {
    fake_scraper_with(scenario, instant_settings())
}

pub fn fake_scraper_with(
    scenario: FakeMapsScenario,
    settings: ScraperSettings,
) -> (MapsScraper, Arc<FakeLauncher>) {
    let launcher = Arc::new(FakeLauncher::new(scenario));
    let scraper = MapsScraper::new(launcher.clone(), Arc::new(settings))
        .expect("default selectors compile");
    (scraper, launcher)
}

pub struct TestService {
    pub service: Arc<ScrapeJobService<InMemoryJobRepository>>,
    pub repo: Arc<InMemoryJobRepository>,
    pub launcher: Arc<FakeLauncher>,
}

pub fn fake_service(scenario: FakeMapsScenario, output_dir: &Path) -> TestService {
    let (scraper, launcher) = fake_scraper(scenario);
    let repo = Arc::new(InMemoryJobRepository::new());
    let service = ScrapeJobService::new(
        repo.clone(),
        Arc::new(scraper),
        CsvExporter::new(output_dir),
        JobSettings::default(),
    );
    TestService {
        service: Arc::new(service),
        repo,
        launcher,
    }
}

/// 记录所有进度事件
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(|e| e.name()).collect()
    }
}

#[async_trait]
impl ProgressSink for RecordingSink {
    async fn report(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}

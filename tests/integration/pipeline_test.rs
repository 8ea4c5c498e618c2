// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use leadrs::config::settings::ScraperSettings;
use leadrs::domain::models::job::{ScrapeMode, ScrapeOptions};
use leadrs::domain::models::listing::HasWebsite;
use leadrs::domain::models::progress::ProgressEvent;
use leadrs::maps::{Progress, ScrapeError};
use std::collections::HashSet;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use super::helpers::fake_browser::{
    business_name, detail_phone, detail_website, list_website, FakeMapsScenario,
};
use super::helpers::{fake_scraper, fake_scraper_with, instant_settings, RecordingSink};

fn fast(detail_limit: usize) -> ScrapeOptions {
    ScrapeOptions {
        mode: ScrapeMode::Fast,
        detail_limit,
    }
}

#[tokio::test]
async fn fast_mode_enriches_only_first_ten_listings() {
    let (scraper, launcher) = fake_scraper(FakeMapsScenario::with_listings(23));
    let sink = Arc::new(RecordingSink::default());

    let records = scraper
        .scrape("dentists in Austin", &fast(10), &Progress::new(sink.clone()))
        .await
        .unwrap();

    assert_eq!(records.len(), 23);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.business_name, business_name(i));
        assert_eq!(record.address, format!("{} Main St", i));
        if i < 10 {
            assert_eq!(record.phone, detail_phone(i));
            assert_eq!(record.website, detail_website(i));
            assert_eq!(record.has_website, HasWebsite::Yes);
        } else {
            assert_eq!(record.phone, "");
            let expected = if i % 2 == 0 { list_website(i) } else { String::new() };
            assert_eq!(record.website, expected);
        }
    }

    assert_eq!(launcher.state.clicks(), (0..10).collect::<Vec<_>>());
    assert!(launcher.state.is_closed());
    assert_eq!(
        launcher.state.visited.lock().unwrap().as_slice(),
        ["https://www.google.com/maps/search/dentists+in+Austin"]
    );

    let names = sink.names();
    assert_eq!(names.first(), Some(&"browser_starting"));
    assert_eq!(names.last(), Some(&"browser_closed"));
    assert_eq!(names.iter().filter(|n| **n == "extracting").count(), 23);
    assert_eq!(names.iter().filter(|n| **n == "enriching").count(), 10);
    assert!(sink.events().contains(&ProgressEvent::ListingsFound {
        total: 23,
        message: "Found 23 listings".to_string(),
    }));
}

#[tokio::test]
async fn fast_mode_with_zero_limit_never_clicks() {
    let (scraper, launcher) = fake_scraper(FakeMapsScenario::with_listings(4));

    let records = scraper
        .scrape("florists", &fast(0), &Progress::none())
        .await
        .unwrap();

    assert_eq!(records.len(), 4);
    assert!(launcher.state.clicks().is_empty());
    assert_eq!(records[1].has_website, HasWebsite::No);
    assert_eq!(records[2].has_website, HasWebsite::Yes);
}

#[tokio::test]
async fn failed_enrichment_click_keeps_list_record() {
    let scenario = FakeMapsScenario {
        failing_clicks: HashSet::from([1]),
        ..FakeMapsScenario::with_listings(3)
    };
    let (scraper, _launcher) = fake_scraper(scenario);

    let records = scraper
        .scrape("bakeries", &fast(10), &Progress::none())
        .await
        .unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].phone, detail_phone(0));
    assert_eq!(records[1].phone, "");
    assert_eq!(records[1].business_name, business_name(1));
    assert_eq!(records[2].phone, detail_phone(2));
}

#[tokio::test]
async fn detail_mode_reads_every_panel() {
    let (scraper, launcher) = fake_scraper(FakeMapsScenario::with_listings(7));
    let sink = Arc::new(RecordingSink::default());
    let options = ScrapeOptions {
        mode: ScrapeMode::Detail,
        detail_limit: 0,
    };

    let records = scraper
        .scrape("plumbers", &options, &Progress::new(sink.clone()))
        .await
        .unwrap();

    assert_eq!(records.len(), 7);
    assert!(records.iter().all(|r| !r.phone.is_empty()));
    assert_eq!(
        records[3].google_maps_link,
        "https://www.google.com/maps/place/Business+3"
    );
    assert_eq!(launcher.state.clicks(), (0..7).collect::<Vec<_>>());
    assert!(sink.events().contains(&ProgressEvent::Extracting {
        current: 7,
        total: 7,
        collected: 7,
        business: business_name(6),
    }));
}

#[tokio::test]
async fn missing_feed_yields_empty_result_and_closes_browser() {
    let scenario = FakeMapsScenario {
        feed_missing: true,
        ..FakeMapsScenario::with_listings(5)
    };
    let (scraper, launcher) = fake_scraper(scenario);
    let sink = Arc::new(RecordingSink::default());

    let records = scraper
        .scrape("asdfghjkl", &fast(10), &Progress::new(sink.clone()))
        .await
        .unwrap();

    assert!(records.is_empty());
    assert!(launcher.state.is_closed());
    assert_eq!(launcher.state.scrolls.load(Ordering::SeqCst), 0);
    let names = sink.names();
    assert!(names.contains(&"error"));
    assert_eq!(names.last(), Some(&"browser_closed"));
}

#[tokio::test]
async fn browser_error_propagates_after_cleanup() {
    let scenario = FakeMapsScenario {
        fail_content: true,
        ..FakeMapsScenario::with_listings(5)
    };
    let (scraper, launcher) = fake_scraper(scenario);

    let result = scraper
        .scrape("gyms", &fast(10), &Progress::none())
        .await;

    assert!(matches!(result, Err(ScrapeError::Engine(_))));
    assert!(launcher.state.is_closed());
}

#[tokio::test]
async fn panic_inside_scrape_loop_still_closes_browser() {
    let scenario = FakeMapsScenario {
        panic_on_scroll: true,
        ..FakeMapsScenario::with_listings(5)
    };
    let (scraper, launcher) = fake_scraper(scenario);
    let sink = Arc::new(RecordingSink::default());

    let result = scraper
        .scrape("barbers", &fast(10), &Progress::new(sink.clone()))
        .await;

    match result {
        Err(ScrapeError::Panicked(message)) => assert!(message.contains("exploded")),
        other => panic!("expected panic error, got {:?}", other),
    }
    assert!(launcher.state.is_closed());
    assert_eq!(sink.names().last(), Some(&"browser_closed"));
}

#[tokio::test]
async fn launch_failure_is_reported() {
    let scenario = FakeMapsScenario {
        fail_launch: true,
        ..FakeMapsScenario::default()
    };
    let (scraper, launcher) = fake_scraper(scenario);
    let sink = Arc::new(RecordingSink::default());

    let result = scraper
        .scrape("vets", &fast(10), &Progress::new(sink.clone()))
        .await;

    assert!(matches!(result, Err(ScrapeError::Engine(_))));
    assert_eq!(launcher.state.launches.load(Ordering::SeqCst), 0);
    assert_eq!(sink.names(), vec!["browser_starting", "error"]);
}

#[tokio::test]
async fn consent_dialog_is_dismissed_before_waiting_for_feed() {
    let scenario = FakeMapsScenario {
        consent_button: Some("button#L2AGLb".to_string()),
        ..FakeMapsScenario::with_listings(3)
    };
    let (scraper, launcher) = fake_scraper(scenario);

    let records = scraper
        .scrape("pharmacies", &fast(0), &Progress::none())
        .await
        .unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(
        launcher.state.actions()[..3],
        ["goto", "click:button#L2AGLb", "wait_for"]
    );
}

#[tokio::test]
async fn consent_click_failure_is_not_fatal() {
    let scenario = FakeMapsScenario {
        failing_consent: true,
        ..FakeMapsScenario::with_listings(3)
    };
    let (scraper, launcher) = fake_scraper(scenario);

    let records = scraper
        .scrape("pharmacies", &fast(0), &Progress::none())
        .await
        .unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(
        launcher.state.actions()[..3],
        ["goto", "consent_failed", "wait_for"]
    );
}

#[tokio::test]
async fn missing_feed_saves_debug_screenshot() {
    let dir = tempfile::tempdir().unwrap();
    let shots = dir.path().join("shots");
    let settings = ScraperSettings {
        debug_screenshot_dir: Some(shots.to_string_lossy().into_owned()),
        ..instant_settings()
    };
    let scenario = FakeMapsScenario {
        feed_missing: true,
        ..FakeMapsScenario::default()
    };
    let (scraper, launcher) = fake_scraper_with(scenario, settings);

    let records = scraper
        .scrape("nail salons", &fast(10), &Progress::none())
        .await
        .unwrap();

    assert!(records.is_empty());
    assert!(shots.is_dir());
    let screenshots = launcher.state.screenshots.lock().unwrap().clone();
    assert_eq!(screenshots.len(), 1);
    assert_eq!(screenshots[0].parent(), Some(shots.as_path()));
    let file_name = screenshots[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(file_name.starts_with("feed_missing_nail_salons_"));
    assert!(file_name.ends_with(".png"));
}

#[tokio::test]
async fn missing_feed_without_screenshot_dir_takes_no_screenshot() {
    let scenario = FakeMapsScenario {
        feed_missing: true,
        ..FakeMapsScenario::default()
    };
    let (scraper, launcher) = fake_scraper(scenario);

    scraper
        .scrape("nail salons", &fast(10), &Progress::none())
        .await
        .unwrap();

    assert!(launcher.state.screenshots.lock().unwrap().is_empty());
}

#[tokio::test]
async fn stale_detail_panel_is_not_merged() {
    let scenario = FakeMapsScenario {
        unresponsive_clicks: HashSet::from([2]),
        ..FakeMapsScenario::with_listings(4)
    };
    let (scraper, _launcher) = fake_scraper(scenario);

    let records = scraper
        .scrape("hardware stores", &fast(10), &Progress::none())
        .await
        .unwrap();

    assert_eq!(records[1].phone, detail_phone(1));
    assert_eq!(records[2].business_name, business_name(2));
    assert_eq!(records[2].phone, "");
    assert_eq!(records[2].website, list_website(2));
    assert_eq!(records[2].has_website, HasWebsite::Yes);
    assert_eq!(records[3].phone, detail_phone(3));
}

#[tokio::test]
async fn detail_mode_skips_click_without_panel() {
    let scenario = FakeMapsScenario {
        unresponsive_clicks: HashSet::from([0]),
        ..FakeMapsScenario::with_listings(3)
    };
    let (scraper, _launcher) = fake_scraper(scenario);
    let options = ScrapeOptions {
        mode: ScrapeMode::Detail,
        detail_limit: 0,
    };

    let records = scraper
        .scrape("tailors", &options, &Progress::none())
        .await
        .unwrap();

    let names: Vec<&str> = records.iter().map(|r| r.business_name.as_str()).collect();
    assert_eq!(names, [business_name(1), business_name(2)]);
}

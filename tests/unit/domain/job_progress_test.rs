// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use leadrs::domain::models::job::{Job, JobPhase, JobStatus, ScrapeOptions};
use leadrs::domain::models::listing::ListingRecord;
use leadrs::domain::models::progress::ProgressEvent;
use std::path::PathBuf;

/// 一次完整抓取的事件序列推动任务状态
#[test]
fn test_event_sequence_drives_job_state() {
    let mut job = Job::new("vets in Boise", ScrapeOptions::default(), 200);
    job.mark_running();

    let events = vec![
        ProgressEvent::BrowserStarting {
            message: "Launching browser...".to_string(),
        },
        ProgressEvent::Navigating {
            message: "Opening Google Maps: vets in Boise".to_string(),
        },
        ProgressEvent::Waiting {
            message: "Waiting for results to load...".to_string(),
        },
        ProgressEvent::Scrolling {
            count: 5,
            message: None,
        },
        ProgressEvent::ScrollComplete { count: 9 },
        ProgressEvent::ListingsFound {
            total: 2,
            message: "Found 2 listings".to_string(),
        },
        ProgressEvent::Extracting {
            current: 2,
            total: 2,
            collected: 2,
            business: "Boise Vet".to_string(),
        },
        ProgressEvent::Enriching {
            current: 1,
            total: 2,
            business: "Animal Clinic".to_string(),
        },
    ];

    for event in &events {
        job.apply_event(event);
    }

    assert_eq!(job.phase, JobPhase::Enriching);
    assert_eq!(job.progress.scroll_count, 9);
    assert_eq!(job.progress.total_listings, 2);
    assert_eq!(job.progress.collected, 2);
    assert_eq!(job.progress.current, 1);
    assert_eq!(job.logs.len(), events.len() + 1);
    assert_eq!(job.logs[4].event, "scrolling");
    assert_eq!(job.logs[4].data["count"], 5);

    job.complete(
        vec![ListingRecord::new("Boise Vet"), ListingRecord::new("Animal Clinic")],
        Some(PathBuf::from("leads/leads_vets_in_Boise_20250101_000000.csv")),
    );
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.total_leads, Some(2));
    assert!(job.completed_at.is_some());
    assert_eq!(job.log_tail(1)[0].event, "completed");
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use leadrs::domain::models::listing::{HasWebsite, ListingRecord};
use leadrs::domain::services::listing_service::{deduplicate, summarize};

fn record(name: &str, address: &str, website: &str) -> ListingRecord {
    let mut record = ListingRecord::new(name);
    record.address = address.to_string();
    record.set_website(website);
    record
}

#[test]
fn test_same_name_different_address_is_kept() {
    let records = vec![
        record("Starbucks", "1 Congress Ave", "https://starbucks.com"),
        record("Starbucks", "500 Lamar Blvd", "https://starbucks.com"),
        record("Starbucks", "1 Congress Ave", ""),
    ];

    let unique = deduplicate(records);

    assert_eq!(unique.len(), 2);
    assert_eq!(unique[0].address, "1 Congress Ave");
    assert_eq!(unique[0].has_website, HasWebsite::Yes);
    assert_eq!(unique[1].address, "500 Lamar Blvd");

    let summary = summarize(&unique);
    assert_eq!(summary.total, 2);
    assert_eq!(summary.with_website, 2);
    assert_eq!(summary.without_website, 0);
}

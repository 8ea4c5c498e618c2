// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

use crate::config::settings::MetricsSettings;

pub const JOBS_TOTAL: &str = "leadrs_jobs_total";
pub const JOBS_COMPLETED_TOTAL: &str = "leadrs_jobs_completed_total";
pub const JOBS_FAILED_TOTAL: &str = "leadrs_jobs_failed_total";
pub const LISTINGS_EXTRACTED_TOTAL: &str = "leadrs_listings_extracted_total";
pub const JOB_DURATION_SECONDS: &str = "leadrs_job_duration_seconds";

/// 初始化指标导出
///
/// 未启用时不安装任何recorder，`metrics` 宏调用为空操作
pub fn init_metrics(settings: &MetricsSettings) {
    if !settings.enabled {
        info!("Metrics exporter disabled");
        return;
    }

    let addr: SocketAddr = match settings.listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Invalid metrics address '{}': {}", settings.listen_addr, e);
            return;
        }
    };

    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
        return;
    }

    describe_counter!(JOBS_TOTAL, "Total number of scrape jobs submitted");
    describe_counter!(JOBS_COMPLETED_TOTAL, "Total number of scrape jobs completed");
    describe_counter!(JOBS_FAILED_TOTAL, "Total number of scrape jobs failed");
    describe_counter!(
        LISTINGS_EXTRACTED_TOTAL,
        "Total number of unique listings extracted"
    );
    describe_histogram!(JOB_DURATION_SECONDS, "Duration of scrape jobs in seconds");

    info!("Metrics exporter listening on {}", addr);
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

mod cli;

use clap::Parser;
use leadrs::application::use_cases::scrape_job::ScrapeJobService;
use leadrs::config::settings::Settings;
use leadrs::domain::models::job::{JobStatus, ScrapeOptions};
use leadrs::domain::services::listing_service::summarize;
use leadrs::engines::chromium_engine::ChromiumLauncher;
use leadrs::infrastructure::metrics::init_metrics;
use leadrs::infrastructure::repositories::job_repo_impl::InMemoryJobRepository;
use leadrs::infrastructure::storage::CsvExporter;
use leadrs::maps::MapsScraper;
use leadrs::presentation::routes;
use leadrs::utils::telemetry;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::net::TcpListener;
use tracing::info;

use crate::cli::{prompt_query, scrape_options, Cli, Commands};

type Service = ScrapeJobService<InMemoryJobRepository>;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    let cli = Cli::parse();

    // 2. Load configuration
    let settings = Settings::new()?;
    info!("Configuration loaded");

    // 3. Initialize Prometheus Metrics
    init_metrics(&settings.metrics);

    // 4. Initialize Components
    let service = Arc::new(build_service(&settings)?);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(&settings, service).await,
        Commands::Scrape {
            query,
            mode,
            detail_limit,
        } => {
            let query = if query.is_empty() {
                prompt_query(&mut BufReader::new(tokio::io::stdin())).await?
            } else {
                query.join(" ")
            };
            let options = scrape_options(service.default_options(), mode, detail_limit);
            scrape_once(&service, &query, options).await
        }
    }
}

fn build_service(settings: &Settings) -> anyhow::Result<Service> {
    let launcher = Arc::new(ChromiumLauncher::new(settings.browser.clone()));
    let scraper = MapsScraper::new(launcher, Arc::new(settings.scraper.clone()))?;
    let repo = Arc::new(InMemoryJobRepository::new());
    let exporter = CsvExporter::new(&settings.storage.output_dir);

    Ok(ScrapeJobService::new(
        repo,
        Arc::new(scraper),
        exporter,
        settings.jobs.clone(),
    ))
}

async fn serve(settings: &Settings, service: Arc<Service>) -> anyhow::Result<()> {
    let app = routes::routes(service);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    info!("Starting leadrs on {}", addr);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn scrape_once(service: &Service, query: &str, options: ScrapeOptions) -> anyhow::Result<()> {
    info!("Searching: {} ({} mode)", query, options.mode);
    let job = service.execute(query, options).await?;

    if job.status == JobStatus::Failed {
        anyhow::bail!(job.error.unwrap_or_else(|| "Scrape failed".to_string()));
    }

    let leads = job.results.unwrap_or_default();
    let summary = summarize(&leads);
    println!("Total leads: {}", summary.total);
    println!("With website: {}", summary.with_website);
    println!("Without website: {}", summary.without_website);
    match job.csv_file {
        Some(path) => println!("Saved to: {}", path.display()),
        None => println!("No results found for '{}'", query),
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}

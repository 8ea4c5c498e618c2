// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use leadrs::domain::models::job::{ScrapeMode, ScrapeOptions};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(
    name = "leadrs",
    version,
    about = "Collect business leads from Google Maps search results"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP job API (default)
    Serve,

    /// Run one scrape in the foreground and write the CSV
    Scrape {
        /// Search query, e.g. "dentists in Austin" (prompted when omitted)
        #[arg(num_args = 0..)]
        query: Vec<String>,

        #[arg(long, value_enum)]
        mode: Option<ModeArg>,

        /// Listings to enrich from the detail panel in fast mode (0 disables)
        #[arg(long)]
        detail_limit: Option<usize>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    Fast,
    Detail,
}

impl From<ModeArg> for ScrapeMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Fast => ScrapeMode::Fast,
            ModeArg::Detail => ScrapeMode::Detail,
        }
    }
}

/// 命令行参数覆盖配置默认值
pub fn scrape_options(
    defaults: ScrapeOptions,
    mode: Option<ModeArg>,
    detail_limit: Option<usize>,
) -> ScrapeOptions {
    ScrapeOptions {
        mode: mode.map(ScrapeMode::from).unwrap_or(defaults.mode),
        detail_limit: detail_limit.unwrap_or(defaults.detail_limit),
    }
}

/// 交互式读取查询词
///
/// 读到空行或输入结束时报错
pub async fn prompt_query<R>(input: &mut R) -> anyhow::Result<String>
where
    R: AsyncBufRead + Unpin,
{
    print!("Enter search query (e.g., 'dentists in Austin'): ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    input.read_line(&mut line).await?;
    let query = line.trim();
    if query.is_empty() {
        anyhow::bail!("Query cannot be empty");
    }
    Ok(query.to_string())
}

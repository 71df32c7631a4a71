//! Command-line front end: crawl one site and print the result as JSON.
//!
//! Usage: sitescout [OPTIONS] <URL>
//! Example: sitescout --max-pages 20 --static https://example.com

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use sitescout::utils::constants::{
    DEFAULT_CRAWL_DELAY_SECS, DEFAULT_MAX_DEPTH, DEFAULT_MAX_PAGES, DEFAULT_PARALLEL_WORKERS,
    DEFAULT_USER_AGENT,
};
use sitescout::{CrawlConfig, CrawlPhase, CrawlStats, ProgressReporter};

#[derive(Debug, Parser)]
#[command(name = "sitescout", version, about = "Discover and catalog the pages of a website")]
struct Cli {
    /// Absolute http(s) URL to start from.
    url: String,

    #[arg(long, env = "SITESCOUT_MAX_PAGES", default_value_t = DEFAULT_MAX_PAGES)]
    max_pages: usize,

    #[arg(long, env = "SITESCOUT_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: u32,

    /// Pages rendered concurrently.
    #[arg(long, env = "SITESCOUT_WORKERS", default_value_t = DEFAULT_PARALLEL_WORKERS)]
    workers: usize,

    /// Seconds to wait between batches.
    #[arg(long, env = "SITESCOUT_CRAWL_DELAY", default_value_t = DEFAULT_CRAWL_DELAY_SECS)]
    crawl_delay: f64,

    /// Ignore the robots.txt Crawl-delay directive.
    #[arg(long)]
    ignore_robots_delay: bool,

    /// Probe common and CMS-specific paths before crawling.
    #[arg(long, env = "SITESCOUT_AGGRESSIVE")]
    aggressive: bool,

    /// Navigation timeout in seconds.
    #[arg(long, env = "SITESCOUT_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    #[arg(long, env = "SITESCOUT_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Show the browser window.
    #[arg(long)]
    headed: bool,

    /// Fetch pages over plain HTTP instead of rendering them in a browser.
    #[arg(long = "static")]
    static_mode: bool,

    /// Write JSON here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Logs phase and error notifications at info level.
struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report_phase(&self, phase: CrawlPhase) {
        log::info!("Phase: {phase:?}");
    }

    fn report_page_started(&self, _url: &str, _depth: u32) {}

    fn report_page_completed(&self, url: &str, links: usize) {
        log::debug!("Rendered {url} ({links} links)");
    }

    fn report_error(&self, url: &str, error: &str) {
        log::info!("Error on {url}: {error}");
    }

    fn report_completed(&self, stats: &CrawlStats) {
        log::info!(
            "Done: {} pages, {} failures, {} batches",
            stats.pages_rendered,
            stats.pages_failed,
            stats.batches
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("chromiumoxide::handler", log::LevelFilter::Off)
        .filter_module("chromiumoxide::conn", log::LevelFilter::Off)
        .init();

    let cli = Cli::parse();

    let config = CrawlConfig::builder()
        .max_pages(cli.max_pages)
        .max_depth(cli.max_depth)
        .parallel_workers(cli.workers)
        .crawl_delay(cli.crawl_delay)
        .respect_robots_delay(!cli.ignore_robots_delay)
        .aggressive_mode(cli.aggressive)
        .navigation_timeout(Duration::from_secs(cli.timeout))
        .user_agent(cli.user_agent)
        .headless(!cli.headed)
        .build()?;

    let result = if cli.static_mode {
        sitescout::crawl_static_with_progress(&cli.url, config, LogProgress).await?
    } else {
        sitescout::crawl_with_progress(&cli.url, config, LogProgress).await?
    };

    let json = serde_json::to_string_pretty(&result).context("Failed to serialize crawl result")?;
    match cli.output {
        Some(path) => std::fs::write(&path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{json}"),
    }

    Ok(())
}

use std::io::Write;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use url::Url;

use crate::api;
use crate::config::{Config, LogFormat};
use crate::dispatcher::Dispatcher;
use crate::registry::Registry;
use crate::scrapers::ScrapeContext;
use crate::types::{ScrapeRequest, ScrapeResult};

#[derive(Debug, Parser)]
#[command(
    name = "product-scraper",
    about = "Fetch retail product pages and normalize them into title/id/price records",
    version
)]
pub struct Cli {
    /// Per-request HTTP timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Maximum number of scrapes executing at once
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_in_flight: Option<u64>,

    /// Log output format
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the registered scrapers
    List,
    /// Scrape one or more product URLs with one scraper and print the results as JSON
    Scrape {
        /// Scraper name (see `list`)
        scraper: String,
        /// Product page URLs
        #[arg(required = true, value_parser = absolute_url)]
        urls: Vec<String>,
    },
    /// Serve the HTTP API
    Serve {
        /// Listen address, e.g. 0.0.0.0:8000
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
}

/// Accepts only absolute URLs but keeps the text exactly as given.
fn absolute_url(raw: &str) -> Result<String, url::ParseError> {
    Url::parse(raw)?;
    Ok(raw.to_string())
}

impl Cli {
    /// Command-line flags win over the environment.
    pub fn apply(&self, config: &mut Config) {
        if let Some(secs) = self.timeout {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(n) = self.max_in_flight {
            config.max_in_flight = usize::try_from(n).unwrap_or(usize::MAX);
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        if let Command::Serve { bind: Some(addr) } = &self.command {
            config.bind_addr = *addr;
        }
    }
}

fn build_dispatcher(registry: Registry, config: &Config) -> anyhow::Result<Dispatcher> {
    let ctx = ScrapeContext::http(config).context("failed to build HTTP client")?;
    Ok(Dispatcher::new(registry, ctx, config.max_in_flight))
}

/// Writes each result as pretty JSON. Fails the exit code if any result is an
/// error.
pub fn report(results: &[ScrapeResult], out: &mut impl Write) -> anyhow::Result<ExitCode> {
    let mut failed = false;
    for result in results {
        writeln!(out, "{}", serde_json::to_string_pretty(result)?)?;
        failed |= !result.is_success();
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

pub async fn run(cli: Cli, config: Config) -> anyhow::Result<ExitCode> {
    let registry = Registry::builtin().context("failed to assemble scraper registry")?;

    match cli.command {
        Command::List => {
            for name in registry.list() {
                println!("{}", name);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Scrape { scraper, urls } => {
            let dispatcher = build_dispatcher(registry, &config)?;
            let requests: Vec<ScrapeRequest> = urls
                .into_iter()
                .map(|url| ScrapeRequest::new(scraper.as_str(), url))
                .collect();

            let results = dispatcher.run_all(&requests).await;
            report(&results, &mut std::io::stdout().lock())
        }
        Command::Serve { .. } => {
            let dispatcher = build_dispatcher(registry, &config)?;
            api::serve(config.bind_addr, dispatcher)
                .await
                .context("API server failed")?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

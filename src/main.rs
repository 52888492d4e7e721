use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use product_scraper::cli::{self, Cli};
use product_scraper::{logging, Config};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = Config::from_env().context("invalid configuration")?;
    cli.apply(&mut config);

    logging::init(config.log_format);
    tracing::debug!(?config, "configuration loaded");

    cli::run(cli, config).await
}

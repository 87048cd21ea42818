use std::sync::Arc;

use anyhow::Context;
use blog_app::{logging, Config, Shell};
use blog_core::{BlogApi, BlogApp, BlogClient, BlogStore, ReqwestTransport};
use clap::Parser;
use tokio::io::BufReader;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    logging::init(config.log_level)?;
    info!(api_url = %config.api_url, "starting");

    let transport = ReqwestTransport::new().context("building HTTP client")?;
    let api = BlogApi::new(BlogClient::new(&config.api_url), Arc::new(transport));
    let app = BlogApp::new(BlogStore::new(api));

    let mut shell = Shell::new(app, BufReader::new(tokio::io::stdin()), std::io::stdout());
    shell.run().await
}

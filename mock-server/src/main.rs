use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// In-memory blog API for local development.
#[derive(Debug, Parser)]
struct Args {
    #[arg(long, env = "PORT", default_value_t = 3001)]
    port: u16,

    /// JSON array of blogs to start with.
    #[arg(long, value_name = "PATH")]
    seed: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let blogs: Vec<mock_server::Blog> = match &args.seed {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading seed file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parsing seed file {}", path.display()))?
        }
        None => Vec::new(),
    };

    let addr = format!("127.0.0.1:{}", args.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, seeded = blogs.len(), "listening");
    mock_server::run_with_blogs(listener, blogs).await?;
    Ok(())
}

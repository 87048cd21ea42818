//! Command-line and environment configuration for the `blog` binary.

use clap::Parser;
use tracing::level_filters::LevelFilter;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:3001";

#[derive(Parser, Debug, Clone)]
#[command(name = "blog", version, about = "Browse and create blog posts from the terminal")]
pub struct Config {
    /// Base URL of the blog API, e.g. <http://localhost:3001>
    #[arg(long, env = "BLOG_API_URL", default_value = DEFAULT_API_URL, value_parser = parse_api_url)]
    pub api_url: Url,

    /// Log level used when `RUST_LOG` is unset (logs go to stderr)
    #[arg(long, env = "BLOG_LOG_LEVEL", default_value_t = LevelFilter::WARN)]
    pub log_level: LevelFilter,
}

/// Accept absolute http(s) URLs only.
fn parse_api_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|err| format!("invalid URL `{raw}`: {err}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(format!("unsupported scheme `{scheme}`, expected http or https")),
    }
}

//! falkordblite-fetch
//!
//! Downloads the Redis source release and stages it for the build.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use falkordblite::fetch::{self, ArchiveFetcher, RetryPolicy};
use falkordblite::versions;
use tracing_subscriber::{fmt, EnvFilter};

/// falkordblite archive fetcher
#[derive(Parser, Debug)]
#[command(name = "falkordblite-fetch")]
#[command(about = "Download and stage the redis-server source archive")]
#[command(version)]
struct Args {
    /// versions.txt or setup.cfg used to resolve the Redis version
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Redis version (overrides config and REDIS_VERSION)
    #[arg(long)]
    redis_version: Option<String>,

    /// Archive URL (overrides the version-derived URL)
    #[arg(long)]
    url: Option<String>,

    /// Destination directory
    #[arg(short, long, default_value = fetch::DEFAULT_DESTINATION)]
    dest: PathBuf,

    /// Maximum download attempts
    #[arg(short, long, default_value = "5")]
    attempts: u32,

    /// Backoff after the first failed attempt, in milliseconds
    #[arg(long, default_value = "1000")]
    base_delay_ms: u64,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,falkordblite=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    let url = match (&args.url, &args.redis_version) {
        (Some(url), _) => url.clone(),
        (None, Some(version)) => fetch::redis_archive_url(version),
        (None, None) => match versions::get_redis_version(args.config.as_deref()) {
            Ok(version) => fetch::redis_archive_url(&version),
            Err(e) => {
                tracing::error!("Cannot resolve the Redis version: {}", e);
                std::process::exit(1);
            }
        },
    };

    let fetcher = ArchiveFetcher::new()
        .retry_policy(RetryPolicy::new(
            args.attempts,
            Duration::from_millis(args.base_delay_ms),
        ))
        .with_env_token();

    match fetcher.fetch_and_stage(&url, &args.dest) {
        Ok(path) => tracing::info!("Staged {} at {}", url, path.display()),
        Err(e) => {
            tracing::error!("Fetch failed: {}", e);
            std::process::exit(1);
        }
    }
}

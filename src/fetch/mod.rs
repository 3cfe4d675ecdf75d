//! Fetch Module
//!
//! Downloads a versioned release archive and stages it at a fixed path.
//!
//! ## Responsibilities
//! - GET the archive with retry and exponential backoff
//! - Send a bearer token when one is configured
//! - Replace the destination directory with the archive's top-level directory
//!
//! A 403 is retried like any other failure; when the attempts run out the
//! caller is pointed at `GITHUB_TOKEN`.

mod archive;
mod retry;
mod transport;

use std::path::{Path, PathBuf};

use crate::error::Result;

pub use archive::{extract_and_stage, DEFAULT_DESTINATION};
pub use retry::{RetryPolicy, Sleeper, ThreadSleeper};
pub use transport::{HttpTransport, UreqTransport};

/// Environment variable holding a token for authenticated downloads
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Source archive URL for a Redis release
pub fn redis_archive_url(version: &str) -> String {
    format!("https://download.redis.io/releases/redis-{}.tar.gz", version)
}

/// Asset URL on a FalkorDB GitHub release
pub fn falkordb_release_url(version: &str, asset: &str) -> String {
    format!(
        "https://github.com/FalkorDB/FalkorDB/releases/download/{}/{}",
        version, asset
    )
}

/// Downloads archives with retries and stages them on disk
pub struct ArchiveFetcher<T = UreqTransport, S = ThreadSleeper> {
    transport: T,
    sleeper: S,
    policy: RetryPolicy,
    token: Option<String>,
}

impl ArchiveFetcher<UreqTransport, ThreadSleeper> {
    /// Fetcher over HTTP with the default retry policy
    pub fn new() -> Self {
        Self::with_transport(UreqTransport::default(), ThreadSleeper)
    }
}

impl Default for ArchiveFetcher<UreqTransport, ThreadSleeper> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: HttpTransport, S: Sleeper> ArchiveFetcher<T, S> {
    /// Fetcher over a custom transport and sleeper
    pub fn with_transport(transport: T, sleeper: S) -> Self {
        Self {
            transport,
            sleeper,
            policy: RetryPolicy::default(),
            token: None,
        }
    }

    /// Set the retry policy
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the bearer token
    pub fn token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    /// Take the bearer token from `GITHUB_TOKEN`, when set
    pub fn with_env_token(self) -> Self {
        let token = std::env::var(TOKEN_ENV).ok();
        self.token(token)
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Download `url`, retrying on any failure
    pub fn download(&self, url: &str) -> Result<Vec<u8>> {
        let result = self.policy.run(&self.sleeper, |attempt| {
            tracing::info!("Downloading {} (attempt {})", url, attempt);
            self.transport.get(url, self.token.as_deref())
        });

        match result {
            Ok(body) => {
                tracing::debug!("Downloaded {} bytes from {}", body.len(), url);
                Ok(body)
            }
            Err(e) => {
                if e.is_forbidden() {
                    tracing::warn!(
                        "{} was refused after {} attempts; set {} to authenticate the download",
                        url,
                        self.policy.max_attempts.max(1),
                        TOKEN_ENV
                    );
                }
                Err(e)
            }
        }
    }

    /// Download `url` and stage the extracted archive at `destination`
    pub fn fetch_and_stage(&self, url: &str, destination: &Path) -> Result<PathBuf> {
        let archive = self.download(url)?;
        extract_and_stage(&archive, destination)
    }
}

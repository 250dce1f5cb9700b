//! Social platform fetchers.
//!
//! Each platform gets one [`PlatformFetcher`] implementation. Callers never
//! invoke `fetch` directly; they go through [`fetch_fail_open`], which bounds
//! the call with a timeout and turns every error into an empty contribution.

mod instagram;
mod reddit;
mod tiktok;
mod twitter;

pub use instagram::InstagramFetcher;
pub use reddit::RedditFetcher;
pub use tiktok::TikTokFetcher;
pub use twitter::TwitterFetcher;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use trendsense_core::{AppConfig, Platform, SocialPost, SourceStatus};

use crate::error::SignalError;

/// Author attached to placeholder posts.
pub const PLACEHOLDER_AUTHOR: &str = "preview_user";

/// Posts returned by one platform plus how they were obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchBatch {
    pub posts: Vec<SocialPost>,
    pub status: SourceStatus,
}

impl FetchBatch {
    #[must_use]
    pub fn live(posts: Vec<SocialPost>) -> Self {
        Self {
            posts,
            status: SourceStatus::Live,
        }
    }

    /// No posts, settled with `status`.
    #[must_use]
    pub fn empty(status: SourceStatus) -> Self {
        Self {
            posts: Vec::new(),
            status,
        }
    }
}

/// Options shared by every fetcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Requested page size. Each platform clamps it to what its API accepts.
    pub limit: u32,
    /// Return one placeholder post instead of nothing when credentials are missing.
    pub placeholder_posts: bool,
}

impl FetchOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            limit: config.posts_per_platform,
            placeholder_posts: config.placeholder_posts,
        }
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            limit: 10,
            placeholder_posts: false,
        }
    }
}

/// A single social source.
///
/// `fetch` may fail; the aggregator only ever calls it through
/// [`fetch_fail_open`].
#[async_trait]
pub trait PlatformFetcher: Send + Sync {
    fn platform(&self) -> Platform;

    /// Fetch recent posts matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError`] on transport failures, non-2xx responses, or
    /// response bodies that do not match the expected shape.
    async fn fetch(&self, query: &str) -> Result<FetchBatch, SignalError>;
}

/// Result for a platform whose credentials are not configured.
pub(crate) fn missing_credentials(
    platform: Platform,
    query: &str,
    options: FetchOptions,
) -> FetchBatch {
    tracing::warn!(
        platform = %platform,
        placeholder = options.placeholder_posts,
        "credentials not configured"
    );
    if options.placeholder_posts {
        FetchBatch {
            posts: vec![placeholder_post(platform, query)],
            status: SourceStatus::Placeholder,
        }
    } else {
        FetchBatch::empty(SourceStatus::Unconfigured)
    }
}

fn placeholder_post(platform: Platform, query: &str) -> SocialPost {
    SocialPost::new(
        platform,
        format!("Sample post about {query}. #sample"),
        Some(PLACEHOLDER_AUTHOR),
        None,
    )
}

/// Run one fetch bounded by `timeout`, converting every failure into an
/// empty batch with a `failed` or `timed_out` status.
pub async fn fetch_fail_open(
    fetcher: &dyn PlatformFetcher,
    query: &str,
    timeout: Duration,
) -> FetchBatch {
    let platform = fetcher.platform();
    match tokio::time::timeout(timeout, fetcher.fetch(query)).await {
        Ok(Ok(batch)) => {
            tracing::debug!(
                platform = %platform,
                count = batch.posts.len(),
                status = %batch.status,
                "fetched posts"
            );
            batch
        }
        Ok(Err(e)) => {
            tracing::warn!(
                platform = %platform,
                error = %e,
                "fetch failed"
            );
            FetchBatch::empty(SourceStatus::Failed)
        }
        Err(_) => {
            tracing::warn!(
                platform = %platform,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                "fetch timed out"
            );
            FetchBatch::empty(SourceStatus::TimedOut)
        }
    }
}

/// Fetchers keyed by the platform they serve.
#[derive(Clone, Default)]
pub struct FetcherRegistry {
    fetchers: BTreeMap<Platform, Arc<dyn PlatformFetcher>>,
}

impl FetcherRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry holding all four live fetchers.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::Http`] if the shared HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, SignalError> {
        let client = build_http_client(config)?;
        let options = FetchOptions::from_config(config);
        let creds = &config.credentials;

        let mut registry = Self::new();
        registry.register(Arc::new(TwitterFetcher::new(
            client.clone(),
            creds.x_bearer_token.clone(),
            options,
        )));
        registry.register(Arc::new(RedditFetcher::new(
            client.clone(),
            creds.reddit_client_id.clone(),
            creds.reddit_client_secret.clone(),
            creds.reddit_user_agent.clone(),
            options,
        )));
        registry.register(Arc::new(InstagramFetcher::new(
            client.clone(),
            creds.instagram_access_token.clone(),
            creds.instagram_user_id.clone(),
            options,
        )));
        registry.register(Arc::new(TikTokFetcher::new(
            client,
            creds.tiktok_access_token.clone(),
            options,
        )));
        Ok(registry)
    }

    /// Register `fetcher` under its platform, returning any fetcher it replaced.
    pub fn register(
        &mut self,
        fetcher: Arc<dyn PlatformFetcher>,
    ) -> Option<Arc<dyn PlatformFetcher>> {
        self.fetchers.insert(fetcher.platform(), fetcher)
    }

    #[must_use]
    pub fn get(&self, platform: Platform) -> Option<Arc<dyn PlatformFetcher>> {
        self.fetchers.get(&platform).cloned()
    }

    /// Registered platforms in stable order.
    #[must_use]
    pub fn platforms(&self) -> Vec<Platform> {
        self.fetchers.keys().copied().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fetchers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fetchers.is_empty()
    }
}

impl std::fmt::Debug for FetcherRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetcherRegistry")
            .field("platforms", &self.platforms())
            .finish()
    }
}

/// Shared outbound client: per-request timeout and the configured user agent.
///
/// # Errors
///
/// Returns [`SignalError::Http`] if the TLS backend cannot be initialised.
pub fn build_http_client(config: &AppConfig) -> Result<reqwest::Client, SignalError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.fetch_timeout_secs))
        .user_agent(&config.user_agent)
        .build()?;
    Ok(client)
}

/// Read a response body and decode it as `T`, reporting shape errors
/// against `platform`.
pub(crate) async fn decode_json<T: serde::de::DeserializeOwned>(
    platform: Platform,
    response: reqwest::Response,
) -> Result<T, SignalError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|source| SignalError::Shape { platform, source })
}

/// Fail with [`SignalError::UnexpectedStatus`] unless the response is 2xx.
pub(crate) fn ensure_success(
    platform: Platform,
    response: reqwest::Response,
) -> Result<reqwest::Response, SignalError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(SignalError::UnexpectedStatus {
            platform,
            status: status.as_u16(),
        })
    }
}

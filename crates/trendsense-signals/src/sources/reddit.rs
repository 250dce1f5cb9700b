//! Reddit search via client-credentials OAuth.

use async_trait::async_trait;
use serde::Deserialize;
use trendsense_core::{Platform, SocialPost};

use super::{
    decode_json, ensure_success, missing_credentials, FetchBatch, FetchOptions, PlatformFetcher,
};
use crate::error::SignalError;

pub const DEFAULT_AUTH_BASE_URL: &str = "https://www.reddit.com";
pub const DEFAULT_API_BASE_URL: &str = "https://oauth.reddit.com";

const MAX_LIMIT: u32 = 100;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: PostData,
}

#[derive(Debug, Deserialize)]
struct PostData {
    title: Option<String>,
    author: Option<String>,
    permalink: Option<String>,
}

pub struct RedditFetcher {
    client: reqwest::Client,
    client_id: Option<String>,
    client_secret: Option<String>,
    user_agent: String,
    auth_base_url: String,
    api_base_url: String,
    options: FetchOptions,
}

impl RedditFetcher {
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        client_id: Option<String>,
        client_secret: Option<String>,
        user_agent: String,
        options: FetchOptions,
    ) -> Self {
        Self {
            client,
            client_id,
            client_secret,
            user_agent,
            auth_base_url: DEFAULT_AUTH_BASE_URL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            options,
        }
    }

    /// Override the token and search hosts.
    #[must_use]
    pub fn with_base_urls(mut self, auth_base_url: &str, api_base_url: &str) -> Self {
        self.auth_base_url = auth_base_url.trim_end_matches('/').to_string();
        self.api_base_url = api_base_url.trim_end_matches('/').to_string();
        self
    }

    async fn fetch_token(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<String, SignalError> {
        let response = self
            .client
            .post(format!("{}/api/v1/access_token", self.auth_base_url))
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SignalError::Auth {
                platform: Platform::Reddit,
                reason: format!("token exchange failed with status {}", response.status()),
            });
        }

        let token: TokenResponse = decode_json(Platform::Reddit, response).await?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl PlatformFetcher for RedditFetcher {
    fn platform(&self) -> Platform {
        Platform::Reddit
    }

    async fn fetch(&self, query: &str) -> Result<FetchBatch, SignalError> {
        let (Some(client_id), Some(client_secret)) =
            (self.client_id.as_deref(), self.client_secret.as_deref())
        else {
            return Ok(missing_credentials(Platform::Reddit, query, self.options));
        };

        let token = self.fetch_token(client_id, client_secret).await?;
        let limit = self.options.limit.clamp(1, MAX_LIMIT).to_string();

        let response = self
            .client
            .get(format!("{}/search", self.api_base_url))
            .bearer_auth(&token)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .query(&[("q", query), ("limit", limit.as_str()), ("sort", "hot")])
            .send()
            .await?;
        let response = ensure_success(Platform::Reddit, response)?;
        let listing: Listing = decode_json(Platform::Reddit, response).await?;

        Ok(FetchBatch::live(to_posts(listing)))
    }
}

/// Every listing child becomes a post. Missing, blank, deleted and removed
/// titles become empty text, which classifies as neutral but still counts
/// toward volume.
fn to_posts(listing: Listing) -> Vec<SocialPost> {
    listing
        .data
        .children
        .into_iter()
        .map(|child| {
            let post = child.data;
            let title = post
                .title
                .as_deref()
                .map(str::trim)
                .filter(|t| !matches!(*t, "[deleted]" | "[removed]"))
                .unwrap_or_default();
            let permalink = post
                .permalink
                .filter(|p| p.starts_with('/'))
                .map(|p| format!("https://www.reddit.com{p}"));
            SocialPost::new(
                Platform::Reddit,
                title,
                post.author.as_deref(),
                permalink.as_deref(),
            )
        })
        .collect()
}

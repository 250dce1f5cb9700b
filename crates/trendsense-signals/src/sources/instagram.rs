//! Instagram Graph API hashtag search.
//!
//! Two calls: resolve the query to a hashtag id, then read that hashtag's
//! top media.

use async_trait::async_trait;
use serde::Deserialize;
use trendsense_core::{Platform, SocialPost};

use super::{decode_json, missing_credentials, FetchBatch, FetchOptions, PlatformFetcher};
use crate::error::SignalError;

pub const DEFAULT_BASE_URL: &str = "https://graph.facebook.com/v20.0";

const MAX_LIMIT: u32 = 50;

#[derive(Debug, Deserialize)]
struct HashtagSearch {
    #[serde(default)]
    data: Vec<Hashtag>,
}

#[derive(Debug, Deserialize)]
struct Hashtag {
    id: String,
}

#[derive(Debug, Deserialize)]
struct MediaPage {
    #[serde(default)]
    data: Vec<Media>,
}

#[derive(Debug, Deserialize)]
struct Media {
    caption: Option<String>,
    permalink: Option<String>,
}

/// Graph API error envelope.
#[derive(Debug, Deserialize)]
struct GraphErrorBody {
    error: GraphError,
}

#[derive(Debug, Deserialize)]
struct GraphError {
    message: String,
}

pub struct InstagramFetcher {
    client: reqwest::Client,
    access_token: Option<String>,
    user_id: String,
    base_url: String,
    options: FetchOptions,
}

impl InstagramFetcher {
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        access_token: Option<String>,
        user_id: String,
        options: FetchOptions,
    ) -> Self {
        Self {
            client,
            access_token,
            user_id,
            base_url: DEFAULT_BASE_URL.to_string(),
            options,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        token: &str,
    ) -> Result<T, SignalError> {
        let response = self
            .client
            .get(format!("{}/{path}", self.base_url))
            .query(&[("user_id", self.user_id.as_str()), ("access_token", token)])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<GraphErrorBody>(&body) {
                Ok(parsed) => SignalError::Api {
                    platform: Platform::Instagram,
                    reason: parsed.error.message,
                },
                Err(_) => SignalError::UnexpectedStatus {
                    platform: Platform::Instagram,
                    status: status.as_u16(),
                },
            });
        }

        decode_json(Platform::Instagram, response).await
    }
}

#[async_trait]
impl PlatformFetcher for InstagramFetcher {
    fn platform(&self) -> Platform {
        Platform::Instagram
    }

    async fn fetch(&self, query: &str) -> Result<FetchBatch, SignalError> {
        let Some(token) = self.access_token.as_deref() else {
            return Ok(missing_credentials(Platform::Instagram, query, self.options));
        };

        let hashtag = sanitize_hashtag(query);
        if hashtag.is_empty() {
            return Ok(FetchBatch::live(Vec::new()));
        }

        let search: HashtagSearch = self
            .get("ig_hashtag_search", &[("q", hashtag.as_str())], token)
            .await?;
        let Some(tag) = search.data.into_iter().next() else {
            tracing::debug!(
                platform = %Platform::Instagram,
                hashtag = %hashtag,
                "no matching hashtag"
            );
            return Ok(FetchBatch::live(Vec::new()));
        };

        let limit = self.options.limit.clamp(1, MAX_LIMIT).to_string();
        let page: MediaPage = self
            .get(
                &format!("{}/top_media", tag.id),
                &[("fields", "id,caption,permalink"), ("limit", limit.as_str())],
                token,
            )
            .await?;

        let posts = page
            .data
            .into_iter()
            .map(|m| {
                SocialPost::new(
                    Platform::Instagram,
                    m.caption.unwrap_or_default(),
                    None,
                    m.permalink.as_deref(),
                )
            })
            .collect();
        Ok(FetchBatch::live(posts))
    }
}

/// Hashtag form of a free-text query: lowercased, whitespace removed, only
/// word characters kept.
pub(crate) fn sanitize_hashtag(query: &str) -> String {
    query
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .flat_map(char::to_lowercase)
        .collect()
}

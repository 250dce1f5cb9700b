//! Twitter/X API v2 recent search.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use trendsense_core::{Platform, SocialPost};

use super::{
    decode_json, ensure_success, missing_credentials, FetchBatch, FetchOptions, PlatformFetcher,
};
use crate::error::SignalError;

pub const DEFAULT_BASE_URL: &str = "https://api.twitter.com";

/// Recent search rejects queries longer than this.
const MAX_QUERY_CHARS: usize = 512;
const MIN_RESULTS: u32 = 10;
const MAX_RESULTS: u32 = 100;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Tweet>,
    #[serde(default)]
    includes: Option<Includes>,
}

#[derive(Debug, Deserialize)]
struct Tweet {
    id: String,
    #[serde(default)]
    text: String,
    author_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Includes {
    #[serde(default)]
    users: Vec<User>,
}

#[derive(Debug, Deserialize)]
struct User {
    id: String,
    username: String,
}

pub struct TwitterFetcher {
    client: reqwest::Client,
    bearer_token: Option<String>,
    base_url: String,
    options: FetchOptions,
}

impl TwitterFetcher {
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        bearer_token: Option<String>,
        options: FetchOptions,
    ) -> Self {
        Self {
            client,
            bearer_token,
            base_url: DEFAULT_BASE_URL.to_string(),
            options,
        }
    }

    /// Point the fetcher at a different API host (tests use a mock server).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl PlatformFetcher for TwitterFetcher {
    fn platform(&self) -> Platform {
        Platform::Twitter
    }

    async fn fetch(&self, query: &str) -> Result<FetchBatch, SignalError> {
        let Some(token) = self.bearer_token.as_deref() else {
            return Ok(missing_credentials(Platform::Twitter, query, self.options));
        };

        let query: String = query.chars().take(MAX_QUERY_CHARS).collect();
        let max_results = self.options.limit.clamp(MIN_RESULTS, MAX_RESULTS).to_string();
        let url = format!("{}/2/tweets/search/recent", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(&[
                ("query", query.as_str()),
                ("tweet.fields", "text,author_id"),
                ("expansions", "author_id"),
                ("max_results", max_results.as_str()),
            ])
            .send()
            .await?;
        let response = ensure_success(Platform::Twitter, response)?;
        let body: SearchResponse = decode_json(Platform::Twitter, response).await?;

        Ok(FetchBatch::live(to_posts(body)))
    }
}

fn to_posts(body: SearchResponse) -> Vec<SocialPost> {
    let usernames: HashMap<String, String> = body
        .includes
        .map(|inc| inc.users)
        .unwrap_or_default()
        .into_iter()
        .map(|u| (u.id, u.username))
        .collect();

    body.data
        .into_iter()
        .map(|tweet| {
            let username = tweet
                .author_id
                .as_ref()
                .and_then(|id| usernames.get(id))
                .map(String::as_str);
            let permalink = format!(
                "https://twitter.com/{}/status/{}",
                username.unwrap_or("i"),
                tweet.id
            );
            SocialPost::new(Platform::Twitter, tweet.text, username, Some(&permalink))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_authors_from_includes() {
        let body: SearchResponse = serde_json::from_str(
            r#"{
                "data": [
                    {"id": "1", "text": "love my air fryer", "author_id": "u1"},
                    {"id": "2", "text": "meh", "author_id": "u404"}
                ],
                "includes": {"users": [{"id": "u1", "username": "chef"}]}
            }"#,
        )
        .unwrap();
        let posts = to_posts(body);
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].author, "chef");
        assert_eq!(posts[0].permalink, "https://twitter.com/chef/status/1");
        assert_eq!(posts[1].author, "twitter_user");
        assert_eq!(posts[1].permalink, "https://twitter.com/i/status/2");
    }

    #[test]
    fn missing_data_is_zero_results() {
        let body: SearchResponse =
            serde_json::from_str(r#"{"meta": {"result_count": 0}}"#).unwrap();
        assert!(to_posts(body).is_empty());
    }
}

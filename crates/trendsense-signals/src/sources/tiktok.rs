//! TikTok Research API video query.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use trendsense_core::{Platform, SocialPost};

use super::{
    decode_json, ensure_success, missing_credentials, FetchBatch, FetchOptions, PlatformFetcher,
};
use crate::error::SignalError;

pub const DEFAULT_BASE_URL: &str = "https://open.tiktokapis.com";

const MAX_COUNT: u32 = 100;
const WINDOW_DAYS: i64 = 7;

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    data: Option<QueryData>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct QueryData {
    #[serde(default)]
    videos: Vec<Video>,
}

#[derive(Debug, Deserialize)]
struct Video {
    id: VideoId,
    video_description: Option<String>,
    username: Option<String>,
}

/// Video ids arrive as JSON numbers; tolerate strings too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VideoId {
    Number(u64),
    Text(String),
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VideoId::Number(n) => write!(f, "{n}"),
            VideoId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    #[serde(default)]
    message: String,
}

pub struct TikTokFetcher {
    client: reqwest::Client,
    access_token: Option<String>,
    base_url: String,
    options: FetchOptions,
}

impl TikTokFetcher {
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        access_token: Option<String>,
        options: FetchOptions,
    ) -> Self {
        Self {
            client,
            access_token,
            base_url: DEFAULT_BASE_URL.to_string(),
            options,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl PlatformFetcher for TikTokFetcher {
    fn platform(&self) -> Platform {
        Platform::TikTok
    }

    async fn fetch(&self, query: &str) -> Result<FetchBatch, SignalError> {
        let Some(token) = self.access_token.as_deref() else {
            return Ok(missing_credentials(Platform::TikTok, query, self.options));
        };

        let body = query_body(
            query,
            Utc::now().date_naive(),
            self.options.limit.clamp(1, MAX_COUNT),
        );
        let response = self
            .client
            .post(format!("{}/v2/research/video/query/", self.base_url))
            .bearer_auth(token)
            .query(&[("fields", "id,video_description,username")])
            .json(&body)
            .send()
            .await?;
        let response = ensure_success(Platform::TikTok, response)?;
        let parsed: QueryResponse = decode_json(Platform::TikTok, response).await?;

        if let Some(err) = parsed.error.filter(|e| e.code != "ok") {
            return Err(SignalError::Api {
                platform: Platform::TikTok,
                reason: format!("{}: {}", err.code, err.message),
            });
        }

        let posts = parsed
            .data
            .map(|d| d.videos)
            .unwrap_or_default()
            .into_iter()
            .map(to_post)
            .collect();
        Ok(FetchBatch::live(posts))
    }
}

/// Keyword query covering the `WINDOW_DAYS` days up to `today`.
fn query_body(query: &str, today: NaiveDate, max_count: u32) -> serde_json::Value {
    let start = today - Duration::days(WINDOW_DAYS);
    json!({
        "query": {
            "and": [{
                "operation": "IN",
                "field_name": "keyword",
                "field_values": [query],
            }]
        },
        "start_date": start.format("%Y%m%d").to_string(),
        "end_date": today.format("%Y%m%d").to_string(),
        "max_count": max_count,
    })
}

fn to_post(video: Video) -> SocialPost {
    let permalink = video
        .username
        .as_deref()
        .filter(|u| !u.trim().is_empty())
        .map(|u| format!("https://www.tiktok.com/@{u}/video/{}", video.id));
    SocialPost::new(
        Platform::TikTok,
        video.video_description.unwrap_or_default(),
        video.username.as_deref(),
        permalink.as_deref(),
    )
}

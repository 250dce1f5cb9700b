//! Integration tests for the platform fetchers.
//!
//! Each test stands up a `wiremock` server in place of the real platform API
//! and points a fetcher at it through its base-URL override.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use trendsense_core::{Platform, SourceStatus};
use trendsense_signals::{
    fetch_fail_open, FetchBatch, FetchOptions, InstagramFetcher, PlatformFetcher, RedditFetcher,
    SignalError, TikTokFetcher, TwitterFetcher,
};

fn http() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .user_agent("trendsense-test/0.1")
        .build()
        .expect("failed to build test client")
}

fn options() -> FetchOptions {
    FetchOptions {
        limit: 10,
        placeholder_posts: false,
    }
}

fn twitter(server: &MockServer) -> TwitterFetcher {
    TwitterFetcher::new(http(), Some("x-token".to_string()), options()).with_base_url(server.uri())
}

fn reddit(server: &MockServer) -> RedditFetcher {
    RedditFetcher::new(
        http(),
        Some("client-id".to_string()),
        Some("client-secret".to_string()),
        "TrendSense/0.1".to_string(),
        options(),
    )
    .with_base_urls(&server.uri(), &server.uri())
}

fn instagram(server: &MockServer) -> InstagramFetcher {
    InstagramFetcher::new(
        http(),
        Some("ig-token".to_string()),
        "me".to_string(),
        options(),
    )
    .with_base_url(server.uri())
}

fn tiktok(server: &MockServer) -> TikTokFetcher {
    TikTokFetcher::new(http(), Some("tt-token".to_string()), options()).with_base_url(server.uri())
}

// ---------------------------------------------------------------------------
// Twitter/X
// ---------------------------------------------------------------------------

#[tokio::test]
async fn twitter_maps_tweets_and_authors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2/tweets/search/recent"))
        .and(query_param("query", "air fryer"))
        .and(query_param("max_results", "10"))
        .and(query_param("expansions", "author_id"))
        .and(header("authorization", "Bearer x-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": "111", "text": "Love this! #musthave #win", "author_id": "u1"}
            ],
            "includes": {"users": [{"id": "u1", "username": "chef_anna"}]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let batch = twitter(&server).fetch("air fryer").await.expect("fetch ok");

    assert_eq!(batch.status, SourceStatus::Live);
    assert_eq!(batch.posts.len(), 1);
    let post = &batch.posts[0];
    assert_eq!(post.platform, Platform::Twitter);
    assert_eq!(post.author, "chef_anna");
    assert_eq!(post.permalink, "https://twitter.com/chef_anna/status/111");
}

#[tokio::test]
async fn twitter_clamps_page_size_to_api_minimum() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2/tweets/search/recent"))
        .and(query_param("max_results", "10"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"meta": {"result_count": 0}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = TwitterFetcher::new(
        http(),
        Some("x-token".to_string()),
        FetchOptions {
            limit: 3,
            placeholder_posts: false,
        },
    )
    .with_base_url(server.uri());
    let batch = fetcher.fetch("kettle").await.expect("fetch ok");
    assert_eq!(batch, FetchBatch::live(Vec::new()));
}

#[tokio::test]
async fn twitter_rate_limit_is_an_error_and_fails_open() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2/tweets/search/recent"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let fetcher = twitter(&server);
    let err = fetcher.fetch("kettle").await.unwrap_err();
    assert!(
        matches!(
            err,
            SignalError::UnexpectedStatus {
                platform: Platform::Twitter,
                status: 429
            }
        ),
        "got {err:?}"
    );

    let batch = fetch_fail_open(&fetcher, "kettle", Duration::from_secs(5)).await;
    assert_eq!(batch, FetchBatch::empty(SourceStatus::Failed));
}

#[tokio::test]
async fn twitter_malformed_json_is_a_shape_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2/tweets/search/recent"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = twitter(&server).fetch("kettle").await.unwrap_err();
    assert!(matches!(err, SignalError::Shape { .. }), "got {err:?}");
}

#[tokio::test]
async fn twitter_without_token_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let fetcher = TwitterFetcher::new(http(), None, options()).with_base_url(server.uri());
    let batch = fetcher.fetch("kettle").await.expect("fetch ok");
    assert_eq!(batch, FetchBatch::empty(SourceStatus::Unconfigured));
}

// ---------------------------------------------------------------------------
// Reddit
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reddit_exchanges_token_then_searches_hot() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .and(header("user-agent", "TrendSense/0.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "reddit-token",
            "token_type": "bearer",
            "expires_in": 86400
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "air fryer"))
        .and(query_param("sort", "hot"))
        .and(query_param("limit", "10"))
        .and(header("authorization", "Bearer reddit-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "Listing",
            "data": {"children": [
                {"kind": "t3", "data": {
                    "title": "Is the new air fryer worth it?",
                    "author": "crispy",
                    "permalink": "/r/airfryer/comments/xyz/is_it_worth_it/"
                }},
                {"kind": "t3", "data": {"title": "[removed]", "author": "[deleted]"}}
            ]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let batch = reddit(&server).fetch("air fryer").await.expect("fetch ok");

    assert_eq!(batch.status, SourceStatus::Live);
    assert_eq!(batch.posts.len(), 2);
    assert_eq!(batch.posts[0].text, "Is the new air fryer worth it?");
    assert_eq!(batch.posts[1].text, "");
    assert_eq!(batch.posts[0].author, "crispy");
    assert_eq!(
        batch.posts[0].permalink,
        "https://www.reddit.com/r/airfryer/comments/xyz/is_it_worth_it/"
    );
}

#[tokio::test]
async fn reddit_rejected_credentials_is_an_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = reddit(&server).fetch("kettle").await.unwrap_err();
    assert!(
        matches!(
            err,
            SignalError::Auth {
                platform: Platform::Reddit,
                ..
            }
        ),
        "got {err:?}"
    );
}

#[tokio::test]
async fn reddit_missing_secret_yields_placeholder_when_enabled() {
    let fetcher = RedditFetcher::new(
        http(),
        Some("client-id".to_string()),
        None,
        "TrendSense/0.1".to_string(),
        FetchOptions {
            limit: 10,
            placeholder_posts: true,
        },
    );
    let batch = fetcher.fetch("running shoes").await.expect("fetch ok");
    assert_eq!(batch.status, SourceStatus::Placeholder);
    assert_eq!(batch.posts.len(), 1);
    assert_eq!(batch.posts[0].text, "Sample post about running shoes. #sample");
    assert_eq!(batch.posts[0].author, "preview_user");
}

// ---------------------------------------------------------------------------
// Instagram
// ---------------------------------------------------------------------------

#[tokio::test]
async fn instagram_resolves_hashtag_then_reads_top_media() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ig_hashtag_search"))
        .and(query_param("q", "airfryer"))
        .and(query_param("user_id", "me"))
        .and(query_param("access_token", "ig-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "17843853986012965"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/17843853986012965/top_media"))
        .and(query_param("fields", "id,caption,permalink"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": "1", "caption": "Crispy fries in 10 minutes #airfryer", "permalink": "https://www.instagram.com/p/abc/"},
                {"id": "2", "permalink": "not a url"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let batch = instagram(&server).fetch("Air Fryer").await.expect("fetch ok");

    assert_eq!(batch.posts.len(), 2);
    assert_eq!(batch.posts[0].author, "instagram_user");
    assert_eq!(batch.posts[0].permalink, "https://www.instagram.com/p/abc/");
    assert_eq!(batch.posts[1].text, "");
    assert_eq!(batch.posts[1].permalink, "https://www.instagram.com");
}

#[tokio::test]
async fn instagram_unknown_hashtag_is_zero_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ig_hashtag_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let batch = instagram(&server).fetch("zzqx").await.expect("fetch ok");
    assert_eq!(batch, FetchBatch::live(Vec::new()));
}

#[tokio::test]
async fn instagram_graph_error_message_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ig_hashtag_search"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"message": "Invalid OAuth access token.", "type": "OAuthException", "code": 190}
        })))
        .mount(&server)
        .await;

    let err = instagram(&server).fetch("skincare").await.unwrap_err();
    match err {
        SignalError::Api { platform, reason } => {
            assert_eq!(platform, Platform::Instagram);
            assert_eq!(reason, "Invalid OAuth access token.");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn instagram_transport_error_does_not_expose_token() {
    let fetcher = InstagramFetcher::new(
        http(),
        Some("SECRET-IG-TOKEN".to_string()),
        "me".to_string(),
        options(),
    )
    .with_base_url("http://127.0.0.1:9");

    let err = fetcher.fetch("air fryer").await.unwrap_err();
    assert!(matches!(err, SignalError::Http(_)), "got {err:?}");
    assert!(!err.to_string().contains("SECRET-IG-TOKEN"), "got {err}");
    assert!(!format!("{err:?}").contains("SECRET-IG-TOKEN"));

    let batch = fetch_fail_open(&fetcher, "air fryer", Duration::from_secs(5)).await;
    assert_eq!(batch.status, SourceStatus::Failed);
}

// ---------------------------------------------------------------------------
// TikTok
// ---------------------------------------------------------------------------

#[tokio::test]
async fn tiktok_queries_keyword_and_maps_videos() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/research/video/query/"))
        .and(query_param("fields", "id,video_description,username"))
        .and(header("authorization", "Bearer tt-token"))
        .and(body_partial_json(json!({
            "query": {"and": [{"operation": "IN", "field_name": "keyword", "field_values": ["summer dress"]}]},
            "max_count": 10
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "videos": [
                    {"id": 7301, "video_description": "summer dress haul #ootd", "username": "styleqs"}
                ],
                "cursor": 1,
                "has_more": false
            },
            "error": {"code": "ok", "message": "", "log_id": "abc"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let batch = tiktok(&server).fetch("summer dress").await.expect("fetch ok");

    assert_eq!(batch.posts.len(), 1);
    assert_eq!(batch.posts[0].author, "styleqs");
    assert_eq!(
        batch.posts[0].permalink,
        "https://www.tiktok.com/@styleqs/video/7301"
    );
}

#[tokio::test]
async fn tiktok_error_code_is_a_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/research/video/query/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {},
            "error": {"code": "access_token_invalid", "message": "token expired"}
        })))
        .mount(&server)
        .await;

    let fetcher = tiktok(&server);
    let err = fetcher.fetch("kettle").await.unwrap_err();
    assert!(matches!(err, SignalError::Api { .. }), "got {err:?}");

    let batch = fetch_fail_open(&fetcher, "kettle", Duration::from_secs(5)).await;
    assert_eq!(batch.status, SourceStatus::Failed);
    assert!(batch.posts.is_empty());
}

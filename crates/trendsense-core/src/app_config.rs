use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Which polarity scorer backs the sentiment classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorerKind {
    /// General-purpose VADER lexicon and rules.
    Vader,
    /// Small product-review keyword lexicon.
    Lexicon,
}

impl std::fmt::Display for ScorerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScorerKind::Vader => write!(f, "vader"),
            ScorerKind::Lexicon => write!(f, "lexicon"),
        }
    }
}

/// Per-platform API credentials. Every field is optional: a missing
/// credential disables the live fetch for that platform.
#[derive(Clone, Default)]
pub struct PlatformCredentials {
    pub x_bearer_token: Option<String>,
    pub reddit_client_id: Option<String>,
    pub reddit_client_secret: Option<String>,
    pub reddit_user_agent: String,
    pub instagram_access_token: Option<String>,
    pub instagram_user_id: String,
    pub tiktok_access_token: Option<String>,
}

impl std::fmt::Debug for PlatformCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[redacted]");
        f.debug_struct("PlatformCredentials")
            .field("x_bearer_token", &redact(&self.x_bearer_token))
            .field("reddit_client_id", &redact(&self.reddit_client_id))
            .field("reddit_client_secret", &redact(&self.reddit_client_secret))
            .field("reddit_user_agent", &self.reddit_user_agent)
            .field(
                "instagram_access_token",
                &redact(&self.instagram_access_token),
            )
            .field("instagram_user_id", &self.instagram_user_id)
            .field("tiktok_access_token", &redact(&self.tiktok_access_token))
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub user_agent: String,
    pub fetch_timeout_secs: u64,
    pub aggregate_deadline_secs: u64,
    pub posts_per_platform: u32,
    pub placeholder_posts: bool,
    pub scorer: ScorerKind,
    pub trending_topics: Vec<String>,
    pub credentials: PlatformCredentials,
    pub analyst_url: Option<String>,
    pub analyst_api_key: Option<String>,
    pub analyst_model: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("user_agent", &self.user_agent)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("aggregate_deadline_secs", &self.aggregate_deadline_secs)
            .field("posts_per_platform", &self.posts_per_platform)
            .field("placeholder_posts", &self.placeholder_posts)
            .field("scorer", &self.scorer)
            .field("trending_topics", &self.trending_topics)
            .field("credentials", &self.credentials)
            .field("analyst_url", &self.analyst_url)
            .field(
                "analyst_api_key",
                &self.analyst_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("analyst_model", &self.analyst_model)
            .finish()
    }
}

use crate::app_config::{AppConfig, Environment, PlatformCredentials, ScorerKind};
use crate::ConfigError;

/// Seed topics used for trending-product discovery when
/// `TRENDSENSE_TRENDING_TOPICS` is unset.
pub const DEFAULT_TRENDING_TOPICS: &[&str] = &[
    "air fryer",
    "skincare",
    "running shoes",
    "summer dress",
    "gaming keyboard",
    "protein powder",
];

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default or is optional: a bare environment yields a
/// working config with all platform fetchers unconfigured.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("TRENDSENSE_ENV", "development"))?;

    let bind_raw = or_default("TRENDSENSE_BIND_ADDR", "0.0.0.0:3000");
    let bind_addr = bind_raw
        .parse::<SocketAddr>()
        .map_err(|e| invalid("TRENDSENSE_BIND_ADDR", e.to_string()))?;

    let log_level = or_default("TRENDSENSE_LOG_LEVEL", "info");
    let user_agent = or_default(
        "TRENDSENSE_USER_AGENT",
        "trendsense/0.1 (demand-forecasting)",
    );

    let fetch_timeout_secs = parse_u64("TRENDSENSE_FETCH_TIMEOUT_SECS", "8")?;
    if fetch_timeout_secs == 0 {
        return Err(invalid(
            "TRENDSENSE_FETCH_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }
    let aggregate_deadline_secs = parse_u64("TRENDSENSE_AGGREGATE_DEADLINE_SECS", "15")?;
    if aggregate_deadline_secs == 0 {
        return Err(invalid(
            "TRENDSENSE_AGGREGATE_DEADLINE_SECS",
            "must be greater than zero".to_string(),
        ));
    }
    let posts_per_platform = parse_u32("TRENDSENSE_POSTS_PER_PLATFORM", "10")?;

    let placeholder_posts = parse_bool(&or_default("TRENDSENSE_PLACEHOLDER_POSTS", "false"))
        .ok_or_else(|| {
            invalid(
                "TRENDSENSE_PLACEHOLDER_POSTS",
                "expected true/false".to_string(),
            )
        })?;

    let scorer = parse_scorer(&or_default("TRENDSENSE_SENTIMENT_SCORER", "vader"))?;

    let trending_topics = optional("TRENDSENSE_TRENDING_TOPICS").map_or_else(
        || {
            DEFAULT_TRENDING_TOPICS
                .iter()
                .map(ToString::to_string)
                .collect()
        },
        |raw| split_topics(&raw),
    );

    let credentials = PlatformCredentials {
        x_bearer_token: optional("X_BEARER_TOKEN"),
        reddit_client_id: optional("REDDIT_CLIENT_ID"),
        reddit_client_secret: optional("REDDIT_CLIENT_SECRET"),
        reddit_user_agent: or_default("REDDIT_USER_AGENT", "TrendSense/0.1"),
        instagram_access_token: optional("INSTAGRAM_ACCESS_TOKEN"),
        instagram_user_id: or_default("INSTAGRAM_USER_ID", "me"),
        tiktok_access_token: optional("TIKTOK_ACCESS_TOKEN"),
    };

    let analyst_url =
        optional("TRENDSENSE_ANALYST_URL").map(|u| u.trim_end_matches('/').to_string());
    let analyst_api_key = optional("TRENDSENSE_ANALYST_API_KEY");
    let analyst_model = or_default("TRENDSENSE_ANALYST_MODEL", "gpt-4o-mini");

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        user_agent,
        fetch_timeout_secs,
        aggregate_deadline_secs,
        posts_per_platform,
        placeholder_posts,
        scorer,
        trending_topics,
        credentials,
        analyst_url,
        analyst_api_key,
        analyst_model,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "TRENDSENSE_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

fn parse_scorer(s: &str) -> Result<ScorerKind, ConfigError> {
    match s.to_ascii_lowercase().as_str() {
        "vader" => Ok(ScorerKind::Vader),
        "lexicon" => Ok(ScorerKind::Lexicon),
        other => Err(ConfigError::InvalidEnvVar {
            var: "TRENDSENSE_SENTIMENT_SCORER".to_string(),
            reason: format!("unknown scorer \"{other}\" (expected vader or lexicon)"),
        }),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn split_topics(raw: &str) -> Vec<String> {
    let mut topics: Vec<String> = Vec::new();
    for topic in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !topics.iter().any(|t| t.eq_ignore_ascii_case(topic)) {
            topics.push(topic.to_string());
        }
    }
    topics
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

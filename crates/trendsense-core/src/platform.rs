use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Social platforms the pipeline can query.
///
/// Ordering follows declaration order and is used for deterministic
/// iteration over per-platform maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Platform {
    Twitter,
    Reddit,
    Instagram,
    TikTok,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown platform \"{0}\" (expected twitter, reddit, instagram or tiktok)")]
pub struct ParsePlatformError(pub String);

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Twitter,
        Platform::Reddit,
        Platform::Instagram,
        Platform::TikTok,
    ];

    /// Lowercase identifier used in query strings and logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Twitter => "twitter",
            Platform::Reddit => "reddit",
            Platform::Instagram => "instagram",
            Platform::TikTok => "tiktok",
        }
    }

    /// Fallback permalink for posts whose own URL is missing or malformed.
    #[must_use]
    pub fn home_url(self) -> &'static str {
        match self {
            Platform::Twitter => "https://twitter.com",
            Platform::Reddit => "https://www.reddit.com",
            Platform::Instagram => "https://www.instagram.com",
            Platform::TikTok => "https://www.tiktok.com",
        }
    }

    /// Author placeholder for posts whose author is unknown.
    #[must_use]
    pub fn default_author(self) -> &'static str {
        match self {
            Platform::Twitter => "twitter_user",
            Platform::Reddit => "reddit_user",
            Platform::Instagram => "instagram_user",
            Platform::TikTok => "tiktok_user",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ParsePlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "twitter" | "x" => Ok(Platform::Twitter),
            "reddit" => Ok(Platform::Reddit),
            "instagram" | "ig" => Ok(Platform::Instagram),
            "tiktok" => Ok(Platform::TikTok),
            _ => Err(ParsePlatformError(s.to_string())),
        }
    }
}

/// Parse a comma-separated platform list, ignoring blanks and duplicates.
///
/// # Errors
///
/// Returns [`ParsePlatformError`] for the first unrecognised entry.
pub fn parse_platform_list(raw: &str) -> Result<Vec<Platform>, ParsePlatformError> {
    let mut platforms = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let platform = part.parse::<Platform>()?;
        if !platforms.contains(&platform) {
            platforms.push(platform);
        }
    }
    Ok(platforms)
}

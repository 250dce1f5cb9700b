use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::platform::Platform;

/// One fetched unit of social content, normalized across platforms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialPost {
    pub platform: Platform,
    pub text: String,
    pub author: String,
    pub permalink: String,
}

impl SocialPost {
    /// Build a post, substituting the platform's author placeholder for a
    /// missing/blank author and its home URL for a missing or non-absolute
    /// permalink.
    #[must_use]
    pub fn new(
        platform: Platform,
        text: impl Into<String>,
        author: Option<&str>,
        permalink: Option<&str>,
    ) -> Self {
        let author = author
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(platform.default_author())
            .to_string();
        let permalink = permalink
            .map(str::trim)
            .filter(|p| is_absolute_http_url(p))
            .unwrap_or(platform.home_url())
            .to_string();

        Self {
            platform,
            text: text.into(),
            author,
            permalink,
        }
    }
}

/// `true` for `http://` / `https://` URLs with a non-empty, whitespace-free host.
fn is_absolute_http_url(candidate: &str) -> bool {
    let rest = candidate
        .strip_prefix("https://")
        .or_else(|| candidate.strip_prefix("http://"));
    let Some(rest) = rest else {
        return false;
    };
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    !host.is_empty() && !candidate.chars().any(char::is_whitespace)
}

/// Three-way sentiment verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "positive"),
            SentimentLabel::Negative => write!(f, "negative"),
            SentimentLabel::Neutral => write!(f, "neutral"),
        }
    }
}

/// Result of classifying one text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub label: SentimentLabel,
    /// Compound polarity in `[-1.0, 1.0]`.
    pub compound_score: f64,
}

impl Classification {
    pub const NEUTRAL: Classification = Classification {
        label: SentimentLabel::Neutral,
        compound_score: 0.0,
    };
}

/// Sentiment counters for one platform. Each classified post increments
/// exactly one counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentTally {
    pub positive: u64,
    pub negative: u64,
    pub neutral: u64,
}

impl SentimentTally {
    /// Returns a new tally with the counter for `label` incremented.
    #[must_use]
    pub fn record(self, label: SentimentLabel) -> Self {
        match label {
            SentimentLabel::Positive => Self {
                positive: self.positive + 1,
                ..self
            },
            SentimentLabel::Negative => Self {
                negative: self.negative + 1,
                ..self
            },
            SentimentLabel::Neutral => Self {
                neutral: self.neutral + 1,
                ..self
            },
        }
    }

    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            positive: self.positive + other.positive,
            negative: self.negative + other.negative,
            neutral: self.neutral + other.neutral,
        }
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.positive + self.negative + self.neutral
    }
}

/// How a platform's contribution to a report was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    /// Real data from the platform API (possibly zero posts).
    Live,
    /// Credentials missing; a fixed placeholder post was substituted.
    Placeholder,
    /// Credentials missing, or no fetcher registered; contributed nothing.
    Unconfigured,
    /// Transport, status, or response-shape failure; contributed nothing.
    Failed,
    /// Still pending at the fetch timeout or aggregate deadline.
    TimedOut,
}

impl SourceStatus {
    #[must_use]
    pub fn is_live(self) -> bool {
        matches!(self, SourceStatus::Live)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SourceStatus::Live => "live",
            SourceStatus::Placeholder => "placeholder",
            SourceStatus::Unconfigured => "unconfigured",
            SourceStatus::Failed => "failed",
            SourceStatus::TimedOut => "timed_out",
        }
    }
}

impl std::fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregated social-trend signal for one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    pub overall_sentiment: SentimentLabel,
    pub trending_topics: BTreeSet<String>,
    pub volume: u64,
    pub sentiment_breakdown: BTreeMap<Platform, SentimentTally>,
    pub source_status: BTreeMap<Platform, SourceStatus>,
}

impl TrendReport {
    /// An all-zero report covering `platforms`, each marked with `status`.
    #[must_use]
    pub fn empty(platforms: &[Platform], status: SourceStatus) -> Self {
        Self {
            overall_sentiment: SentimentLabel::Neutral,
            trending_topics: BTreeSet::new(),
            volume: 0,
            sentiment_breakdown: platforms
                .iter()
                .map(|p| (*p, SentimentTally::default()))
                .collect(),
            source_status: platforms.iter().map(|p| (*p, status)).collect(),
        }
    }

    /// `true` when any queried platform did not contribute live data.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.source_status.values().any(|s| !s.is_live())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_defaults_author_and_permalink() {
        let post = SocialPost::new(Platform::Reddit, "hello", None, Some("not a url"));
        assert_eq!(post.author, "reddit_user");
        assert_eq!(post.permalink, "https://www.reddit.com");
    }

    #[test]
    fn post_keeps_valid_author_and_permalink() {
        let post = SocialPost::new(
            Platform::Twitter,
            "hello",
            Some("jack"),
            Some("https://twitter.com/jack/status/20"),
        );
        assert_eq!(post.author, "jack");
        assert_eq!(post.permalink, "https://twitter.com/jack/status/20");
    }

    #[test]
    fn post_rejects_hostless_and_relative_permalinks() {
        for bad in ["https://", "/r/foo/comments/1", "ftp://example.com", ""] {
            let post = SocialPost::new(Platform::TikTok, "", Some("  "), Some(bad));
            assert_eq!(post.permalink, "https://www.tiktok.com", "input {bad:?}");
            assert_eq!(post.author, "tiktok_user");
        }
    }

    #[test]
    fn tally_record_increments_exactly_one_counter() {
        let t = SentimentTally::default()
            .record(SentimentLabel::Positive)
            .record(SentimentLabel::Positive)
            .record(SentimentLabel::Neutral);
        assert_eq!(
            t,
            SentimentTally {
                positive: 2,
                negative: 0,
                neutral: 1
            }
        );
        assert_eq!(t.total(), 3);
    }

    #[test]
    fn tally_merge_sums_fields() {
        let a = SentimentTally {
            positive: 1,
            negative: 2,
            neutral: 3,
        };
        let b = SentimentTally {
            positive: 4,
            negative: 0,
            neutral: 1,
        };
        assert_eq!(a.merge(b).total(), 11);
        assert_eq!(a.merge(b), b.merge(a));
    }

    #[test]
    fn empty_report_is_neutral_and_zeroed() {
        let report =
            TrendReport::empty(&[Platform::Twitter, Platform::Reddit], SourceStatus::Failed);
        assert_eq!(report.overall_sentiment, SentimentLabel::Neutral);
        assert_eq!(report.volume, 0);
        assert_eq!(report.sentiment_breakdown.len(), 2);
        assert!(report.is_degraded());
    }

    #[test]
    fn report_serializes_with_camel_case_keys() {
        let report = TrendReport::empty(&[Platform::Instagram], SourceStatus::Live);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["overallSentiment"], "neutral");
        assert_eq!(json["volume"], 0);
        assert_eq!(json["sentimentBreakdown"]["Instagram"]["positive"], 0);
        assert_eq!(json["sourceStatus"]["Instagram"], "live");
    }
}

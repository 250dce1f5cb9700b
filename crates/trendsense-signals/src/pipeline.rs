//! Fan-out aggregation across platform fetchers.

use std::collections::BTreeMap;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use trendsense_core::{AppConfig, Platform, SourceStatus, TrendReport};

use crate::classifier::SentimentClassifier;
use crate::error::SignalError;
use crate::sources::{fetch_fail_open, FetchBatch, FetcherRegistry};
use crate::summary::ReportBuilder;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(8);
pub const DEFAULT_AGGREGATE_DEADLINE: Duration = Duration::from_secs(15);

/// Runs every requested fetcher concurrently and folds the results into a
/// [`TrendReport`].
#[derive(Debug, Clone)]
pub struct Aggregator {
    registry: FetcherRegistry,
    classifier: SentimentClassifier,
    fetch_timeout: Duration,
    deadline: Duration,
}

impl Aggregator {
    #[must_use]
    pub fn new(registry: FetcherRegistry, classifier: SentimentClassifier) -> Self {
        Self {
            registry,
            classifier,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            deadline: DEFAULT_AGGREGATE_DEADLINE,
        }
    }

    /// Live fetchers, the configured scorer, and configured time bounds.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, SignalError> {
        let registry = FetcherRegistry::from_config(config)?;
        Ok(Self::new(registry, SentimentClassifier::for_kind(config.scorer))
            .with_fetch_timeout(Duration::from_secs(config.fetch_timeout_secs))
            .with_deadline(Duration::from_secs(config.aggregate_deadline_secs)))
    }

    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Platforms with a registered fetcher.
    #[must_use]
    pub fn platforms(&self) -> Vec<Platform> {
        self.registry.platforms()
    }

    #[must_use]
    pub fn classifier(&self) -> &SentimentClassifier {
        &self.classifier
    }

    /// Fetch `query` from every platform in `platforms` concurrently.
    ///
    /// Every requested platform appears in the result. Platforms with no
    /// registered fetcher settle as `unconfigured`; fetchers still pending
    /// when the aggregate deadline fires are abandoned as `timed_out`.
    pub async fn collect(
        &self,
        query: &str,
        platforms: &[Platform],
    ) -> BTreeMap<Platform, FetchBatch> {
        let mut settled = BTreeMap::new();
        let mut pending = FuturesUnordered::new();

        for &platform in platforms {
            if settled.contains_key(&platform) {
                continue;
            }
            match self.registry.get(platform) {
                Some(fetcher) => {
                    let timeout = self.fetch_timeout;
                    settled.insert(platform, FetchBatch::empty(SourceStatus::TimedOut));
                    pending.push(async move {
                        let batch = fetch_fail_open(fetcher.as_ref(), query, timeout).await;
                        (platform, batch)
                    });
                }
                None => {
                    tracing::warn!(platform = %platform, "no fetcher registered");
                    settled.insert(platform, FetchBatch::empty(SourceStatus::Unconfigured));
                }
            }
        }

        let deadline = tokio::time::sleep(self.deadline);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                next = pending.next() => match next {
                    Some((platform, batch)) => {
                        settled.insert(platform, batch);
                    }
                    None => break,
                },
                () = &mut deadline => {
                    tracing::warn!(
                        query,
                        pending = pending.len(),
                        deadline_secs = self.deadline.as_secs(),
                        "aggregate deadline reached, abandoning pending fetches"
                    );
                    break;
                }
            }
        }

        settled
    }

    /// Fetch, classify, and summarize `query` across `platforms`.
    ///
    /// Never fails: every per-platform problem degrades to an empty tally.
    /// A blank query returns an all-zero report without calling any fetcher.
    pub async fn aggregate(&self, query: &str, platforms: &[Platform]) -> TrendReport {
        let query = query.trim();
        if query.is_empty() {
            tracing::warn!("blank query, skipping fetch");
            return TrendReport::empty(platforms, SourceStatus::Unconfigured);
        }

        let settled = self.collect(query, platforms).await;
        let requested: Vec<Platform> = settled.keys().copied().collect();

        let mut builder = ReportBuilder::new(&self.classifier, &requested);
        for (platform, batch) in settled {
            builder.absorb(platform, batch);
        }
        let report = builder.finish();

        tracing::info!(
            query,
            volume = report.volume,
            overall = %report.overall_sentiment,
            topics = report.trending_topics.len(),
            degraded = report.is_degraded(),
            "aggregated social trends"
        );
        report
    }
}

/// Social trend report for `product_name`.
///
/// `platforms` defaults to every known platform.
pub async fn analyze_social_trends(
    aggregator: &Aggregator,
    product_name: &str,
    platforms: Option<&[Platform]>,
) -> TrendReport {
    let platforms = platforms.unwrap_or(&Platform::ALL);
    aggregator.aggregate(product_name, platforms).await
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use trendsense_core::{SentimentLabel, SentimentTally, SocialPost};

    use super::*;
    use crate::sources::PlatformFetcher;

    struct StubFetcher {
        platform: Platform,
        texts: Vec<&'static str>,
        delay: Duration,
        fail: bool,
        calls: Arc<AtomicUsize>,
    }

    impl StubFetcher {
        fn ok(platform: Platform, texts: Vec<&'static str>) -> Self {
            Self {
                platform,
                texts,
                delay: Duration::ZERO,
                fail: false,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing(platform: Platform) -> Self {
            Self {
                fail: true,
                ..Self::ok(platform, Vec::new())
            }
        }

        fn slow(platform: Platform, delay: Duration) -> Self {
            Self {
                delay,
                ..Self::ok(platform, vec!["late but great"])
            }
        }
    }

    #[async_trait]
    impl PlatformFetcher for StubFetcher {
        fn platform(&self) -> Platform {
            self.platform
        }

        async fn fetch(&self, _query: &str) -> Result<FetchBatch, SignalError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if self.fail {
                return Err(SignalError::UnexpectedStatus {
                    platform: self.platform,
                    status: 503,
                });
            }
            Ok(FetchBatch::live(
                self.texts
                    .iter()
                    .map(|t| SocialPost::new(self.platform, *t, None, None))
                    .collect(),
            ))
        }
    }

    fn aggregator(fetchers: Vec<StubFetcher>) -> Aggregator {
        let mut registry = FetcherRegistry::new();
        for f in fetchers {
            registry.register(Arc::new(f));
        }
        Aggregator::new(registry, SentimentClassifier::default())
    }

    #[tokio::test]
    async fn failing_platform_contributes_zero_tally() {
        let agg = aggregator(vec![
            StubFetcher::ok(
                Platform::Twitter,
                vec![
                    "I love this, it is amazing! #musthave",
                    "Great buy #win",
                    "It arrived on Tuesday",
                ],
            ),
            StubFetcher::failing(Platform::Reddit),
        ]);
        let report = agg
            .aggregate("air fryer", &[Platform::Twitter, Platform::Reddit])
            .await;

        assert_eq!(report.volume, 3);
        assert_eq!(report.overall_sentiment, SentimentLabel::Positive);
        assert_eq!(
            report.sentiment_breakdown[&Platform::Reddit],
            SentimentTally::default()
        );
        assert_eq!(report.sentiment_breakdown[&Platform::Twitter].total(), 3);
        assert_eq!(report.source_status[&Platform::Twitter], SourceStatus::Live);
        assert_eq!(report.source_status[&Platform::Reddit], SourceStatus::Failed);
        assert!(report.trending_topics.contains("musthave"));
        assert!(report.trending_topics.contains("win"));
    }

    #[tokio::test]
    async fn no_posts_anywhere_is_neutral_zero() {
        let agg = aggregator(vec![
            StubFetcher::ok(Platform::Twitter, Vec::new()),
            StubFetcher::failing(Platform::TikTok),
        ]);
        let report = agg
            .aggregate("anything", &[Platform::Twitter, Platform::TikTok])
            .await;
        assert_eq!(report.volume, 0);
        assert_eq!(report.overall_sentiment, SentimentLabel::Neutral);
        assert!(report.trending_topics.is_empty());
        assert_eq!(report.sentiment_breakdown.len(), 2);
    }

    #[tokio::test]
    async fn unregistered_platform_is_unconfigured() {
        let agg = aggregator(vec![StubFetcher::ok(Platform::Twitter, vec!["ok"])]);
        let report = agg
            .aggregate("kettle", &[Platform::Twitter, Platform::Instagram])
            .await;
        assert_eq!(
            report.source_status[&Platform::Instagram],
            SourceStatus::Unconfigured
        );
        assert_eq!(
            report.sentiment_breakdown[&Platform::Instagram],
            SentimentTally::default()
        );
    }

    #[tokio::test]
    async fn blank_query_skips_fetchers() {
        let stub = StubFetcher::ok(Platform::Twitter, vec!["great"]);
        let calls = Arc::clone(&stub.calls);
        let agg = aggregator(vec![stub]);
        let report = agg.aggregate("   ", &[Platform::Twitter]).await;
        assert_eq!(report.volume, 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(report.sentiment_breakdown.contains_key(&Platform::Twitter));
    }

    #[tokio::test]
    async fn duplicate_platforms_fetch_once() {
        let stub = StubFetcher::ok(Platform::Reddit, vec!["good"]);
        let calls = Arc::clone(&stub.calls);
        let agg = aggregator(vec![stub]);
        let report = agg
            .aggregate("kettle", &[Platform::Reddit, Platform::Reddit])
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(report.volume, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn fetches_run_concurrently() {
        let agg = aggregator(vec![
            StubFetcher::slow(Platform::Twitter, Duration::from_secs(5)),
            StubFetcher::slow(Platform::Reddit, Duration::from_secs(5)),
            StubFetcher::slow(Platform::TikTok, Duration::from_secs(5)),
        ])
        .with_fetch_timeout(Duration::from_secs(6))
        .with_deadline(Duration::from_secs(10));

        let started = tokio::time::Instant::now();
        let report = agg
            .aggregate("kettle", &[Platform::Twitter, Platform::Reddit, Platform::TikTok])
            .await;

        assert_eq!(report.volume, 3);
        assert!(started.elapsed() < Duration::from_secs(10));
        assert!(!report.is_degraded());
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_abandons_pending_fetches() {
        let agg = aggregator(vec![
            StubFetcher::ok(Platform::Twitter, vec!["good vibes only"]),
            StubFetcher::slow(Platform::Reddit, Duration::from_secs(60)),
        ])
        .with_fetch_timeout(Duration::from_secs(120))
        .with_deadline(Duration::from_secs(15));

        let report = agg
            .aggregate("kettle", &[Platform::Twitter, Platform::Reddit])
            .await;

        assert_eq!(report.volume, 1);
        assert_eq!(report.source_status[&Platform::Twitter], SourceStatus::Live);
        assert_eq!(
            report.source_status[&Platform::Reddit],
            SourceStatus::TimedOut
        );
        assert_eq!(
            report.sentiment_breakdown[&Platform::Reddit],
            SentimentTally::default()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn per_fetch_timeout_marks_platform_timed_out() {
        let agg = aggregator(vec![StubFetcher::slow(
            Platform::TikTok,
            Duration::from_secs(9),
        )])
        .with_fetch_timeout(Duration::from_secs(8));

        let report = agg.aggregate("kettle", &[Platform::TikTok]).await;
        assert_eq!(report.volume, 0);
        assert_eq!(
            report.source_status[&Platform::TikTok],
            SourceStatus::TimedOut
        );
    }

    #[tokio::test]
    async fn analyze_defaults_to_all_platforms() {
        let agg = aggregator(vec![StubFetcher::ok(
            Platform::Twitter,
            vec!["Love this! #musthave #win"],
        )]);
        let report = analyze_social_trends(&agg, "gadget", None).await;
        assert_eq!(report.sentiment_breakdown.len(), Platform::ALL.len());
        assert_eq!(report.overall_sentiment, SentimentLabel::Positive);
        let topics: Vec<&str> = report.trending_topics.iter().map(String::as_str).collect();
        assert_eq!(topics, vec!["musthave", "win"]);
    }
}

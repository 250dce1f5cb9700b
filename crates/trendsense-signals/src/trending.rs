//! Trending product discovery across seed topics.

use std::collections::HashMap;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use trendsense_core::{AppConfig, Platform, Product, SocialPost};

use crate::analyst::{ChatCompletionsAnalyst, TrendAnalyst};
use crate::error::SignalError;
use crate::fallback::fallback_products;
use crate::pipeline::Aggregator;
use crate::sources::build_http_client;

/// Most products ever returned.
pub const MAX_PRODUCTS: usize = 10;
/// Seed topics fetched at the same time.
pub const DEFAULT_TOPIC_CONCURRENCY: usize = 2;

/// Collects posts for a set of seed topics and asks an analyst which
/// products are trending, falling back to a fixed list on any shortfall.
#[derive(Clone)]
pub struct TrendingProducts {
    aggregator: Arc<Aggregator>,
    analyst: Option<Arc<dyn TrendAnalyst>>,
    topics: Vec<String>,
    topic_concurrency: usize,
}

impl TrendingProducts {
    #[must_use]
    pub fn new(
        aggregator: Arc<Aggregator>,
        analyst: Option<Arc<dyn TrendAnalyst>>,
        topics: Vec<String>,
    ) -> Self {
        Self {
            aggregator,
            analyst,
            topics,
            topic_concurrency: DEFAULT_TOPIC_CONCURRENCY,
        }
    }

    /// Seed topics and analyst from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::Http`] if the analyst HTTP client cannot be built.
    pub fn from_config(
        config: &AppConfig,
        aggregator: Arc<Aggregator>,
    ) -> Result<Self, SignalError> {
        let analyst = ChatCompletionsAnalyst::from_config(config, build_http_client(config)?)
            .map(|a| Arc::new(a) as Arc<dyn TrendAnalyst>);
        if analyst.is_none() {
            tracing::info!("no trend analyst configured, trending products use fallback data");
        }
        Ok(Self::new(aggregator, analyst, config.trending_topics.clone()))
    }

    #[must_use]
    pub fn with_topic_concurrency(mut self, concurrency: usize) -> Self {
        self.topic_concurrency = concurrency.max(1);
        self
    }

    #[must_use]
    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    #[must_use]
    pub fn has_analyst(&self) -> bool {
        self.analyst.is_some()
    }

    /// Posts for every seed topic from every platform, deduplicated by exact
    /// text. Topics keep their configured order and platforms their enum
    /// order. A repeated text keeps the slot of its first occurrence and the
    /// post of its last.
    pub async fn collect_posts(&self) -> Vec<SocialPost> {
        let aggregator = &self.aggregator;
        let batches: Vec<_> = stream::iter(self.topics.iter().cloned())
            .map(|topic| async move { aggregator.collect(&topic, &Platform::ALL).await })
            .buffered(self.topic_concurrency)
            .collect()
            .await;

        let posts = batches
            .into_iter()
            .flat_map(|by_platform| by_platform.into_values())
            .flat_map(|batch| batch.posts);
        dedup_by_text(posts)
    }

    /// Up to [`MAX_PRODUCTS`] trending products. Never fails.
    pub async fn get(&self) -> Vec<Product> {
        let posts = self.collect_posts().await;
        if posts.is_empty() {
            tracing::info!("no social posts collected, returning fallback products");
            return fallback_products();
        }

        let Some(analyst) = self.analyst.as_ref() else {
            tracing::info!(
                posts = posts.len(),
                "no trend analyst configured, returning fallback products"
            );
            return fallback_products();
        };

        tracing::info!(posts = posts.len(), "sending unique posts to trend analyst");
        match analyst.identify_trends(&posts).await {
            Ok(products) if products.is_empty() => {
                tracing::warn!("trend analyst returned no products, returning fallback products");
                fallback_products()
            }
            Ok(mut products) => {
                products.truncate(MAX_PRODUCTS);
                tracing::info!(count = products.len(), "trend analyst identified products");
                products
            }
            Err(e) => {
                tracing::warn!(error = %e, "trend analyst failed, returning fallback products");
                fallback_products()
            }
        }
    }
}

impl std::fmt::Debug for TrendingProducts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrendingProducts")
            .field("topics", &self.topics)
            .field("has_analyst", &self.has_analyst())
            .field("topic_concurrency", &self.topic_concurrency)
            .finish_non_exhaustive()
    }
}

/// Convenience wrapper over [`TrendingProducts::get`].
pub async fn get_trending_products(trending: &TrendingProducts) -> Vec<Product> {
    trending.get().await
}

fn dedup_by_text(posts: impl IntoIterator<Item = SocialPost>) -> Vec<SocialPost> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<SocialPost> = Vec::new();
    for post in posts {
        match slots.get(&post.text) {
            Some(&slot) => unique[slot] = post,
            None => {
                slots.insert(post.text.clone(), unique.len());
                unique.push(post);
            }
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use trendsense_core::InventoryStatus;

    use super::*;
    use crate::classifier::SentimentClassifier;
    use crate::sources::{FetchBatch, FetcherRegistry, PlatformFetcher};

    /// Echoes the query back as post text, plus one shared post.
    struct EchoFetcher(Platform);

    #[async_trait]
    impl PlatformFetcher for EchoFetcher {
        fn platform(&self) -> Platform {
            self.0
        }

        async fn fetch(&self, query: &str) -> Result<FetchBatch, SignalError> {
            Ok(FetchBatch::live(vec![
                SocialPost::new(self.0, format!("{query} is everywhere"), None, None),
                SocialPost::new(self.0, "same text on every platform", None, None),
            ]))
        }
    }

    struct RecordingAnalyst {
        seen: Mutex<Vec<String>>,
        answer: fn() -> Result<Vec<Product>, SignalError>,
    }

    #[async_trait]
    impl TrendAnalyst for RecordingAnalyst {
        async fn identify_trends(
            &self,
            posts: &[SocialPost],
        ) -> Result<Vec<Product>, SignalError> {
            let mut seen = self.seen.lock().unwrap();
            seen.extend(posts.iter().map(|p| p.text.clone()));
            (self.answer)()
        }
    }

    fn sample_product(i: usize) -> Product {
        Product {
            id: format!("prod-{i:03}"),
            name: format!("Gadget {i}"),
            category: "Electronics".to_string(),
            forecasted_demand: 100,
            inventory_status: InventoryStatus::Optimal,
            last_updated: "Just now".to_string(),
            image_url: "https://placehold.co/64x64".to_string(),
            reviews: Vec::new(),
        }
    }

    fn twelve_products() -> Result<Vec<Product>, SignalError> {
        Ok((1..=12).map(sample_product).collect())
    }

    fn no_products() -> Result<Vec<Product>, SignalError> {
        Ok(Vec::new())
    }

    fn analyst_down() -> Result<Vec<Product>, SignalError> {
        Err(SignalError::Analyst("quota exceeded".to_string()))
    }

    fn aggregator(platforms: &[Platform]) -> Arc<Aggregator> {
        let mut registry = FetcherRegistry::new();
        for &p in platforms {
            registry.register(Arc::new(EchoFetcher(p)));
        }
        Arc::new(Aggregator::new(registry, SentimentClassifier::default()))
    }

    fn topics(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    fn analyst(answer: fn() -> Result<Vec<Product>, SignalError>) -> Arc<RecordingAnalyst> {
        Arc::new(RecordingAnalyst {
            seen: Mutex::new(Vec::new()),
            answer,
        })
    }

    #[tokio::test]
    async fn posts_are_deduplicated_in_topic_order() {
        let trending = TrendingProducts::new(
            aggregator(&[Platform::Twitter, Platform::Reddit]),
            None,
            topics(&["air fryer", "skincare", "protein powder"]),
        )
        .with_topic_concurrency(3);

        let texts: Vec<String> = trending
            .collect_posts()
            .await
            .into_iter()
            .map(|p| p.text)
            .collect();
        assert_eq!(
            texts,
            vec![
                "air fryer is everywhere",
                "same text on every platform",
                "skincare is everywhere",
                "protein powder is everywhere",
            ]
        );
    }

    #[tokio::test]
    async fn repeated_text_keeps_first_slot_and_last_post() {
        let trending = TrendingProducts::new(
            aggregator(&[Platform::Twitter, Platform::Reddit]),
            None,
            topics(&["air fryer", "skincare"]),
        );

        let posts = trending.collect_posts().await;
        let shared: Vec<&SocialPost> = posts
            .iter()
            .filter(|p| p.text == "same text on every platform")
            .collect();
        assert_eq!(shared.len(), 1);
        assert_eq!(posts[1].text, "same text on every platform");
        assert_eq!(posts[1].platform, Platform::Reddit);
    }

    #[test]
    fn dedup_replaces_value_in_place() {
        let posts = vec![
            SocialPost::new(Platform::Twitter, "a", Some("first"), None),
            SocialPost::new(Platform::Twitter, "b", None, None),
            SocialPost::new(Platform::TikTok, "a", Some("last"), None),
        ];
        let unique = dedup_by_text(posts);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].author, "last");
        assert_eq!(unique[0].platform, Platform::TikTok);
        assert_eq!(unique[1].text, "b");
    }

    #[tokio::test]
    async fn trending_lookup_runs_on_a_spawned_task() {
        fn assert_send<T: Send>(_: &T) {}

        let trending = Arc::new(TrendingProducts::new(
            aggregator(&[Platform::Twitter]),
            None,
            topics(&["air fryer", "skincare"]),
        ));
        assert_send(&trending.get());

        let products = tokio::spawn(async move { trending.get().await })
            .await
            .expect("trending task panicked");
        assert_eq!(products, fallback_products());
    }

    #[tokio::test]
    async fn no_posts_returns_fallback() {
        let recording = analyst(twelve_products);
        let trending = TrendingProducts::new(
            aggregator(&[]),
            Some(recording.clone() as Arc<dyn TrendAnalyst>),
            topics(&["air fryer"]),
        );
        assert_eq!(trending.get().await, fallback_products());
        assert!(recording.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_analyst_returns_fallback() {
        let trending = TrendingProducts::new(
            aggregator(&[Platform::Twitter]),
            None,
            topics(&["skincare"]),
        );
        assert_eq!(trending.get().await, fallback_products());
    }

    #[tokio::test]
    async fn analyst_failure_returns_fallback() {
        let trending = TrendingProducts::new(
            aggregator(&[Platform::Twitter]),
            Some(analyst(analyst_down) as Arc<dyn TrendAnalyst>),
            topics(&["skincare"]),
        );
        assert_eq!(trending.get().await, fallback_products());
    }

    #[tokio::test]
    async fn empty_analyst_answer_returns_fallback() {
        let trending = TrendingProducts::new(
            aggregator(&[Platform::Twitter]),
            Some(analyst(no_products) as Arc<dyn TrendAnalyst>),
            topics(&["skincare"]),
        );
        assert_eq!(trending.get().await, fallback_products());
    }

    #[tokio::test]
    async fn analyst_products_are_capped_and_see_unique_posts() {
        let recording = analyst(twelve_products);
        let trending = TrendingProducts::new(
            aggregator(&[Platform::Twitter, Platform::TikTok]),
            Some(recording.clone() as Arc<dyn TrendAnalyst>),
            topics(&["air fryer", "skincare"]),
        );
        let products = trending.get().await;
        assert_eq!(products.len(), MAX_PRODUCTS);
        assert_eq!(products[0].id, "prod-001");

        let seen = recording.seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        let unique: HashSet<&String> = seen.iter().collect();
        assert_eq!(unique.len(), seen.len());
    }
}

//! Social signal aggregation for TrendSense.
//!
//! Fans a query out to the Twitter/X, Reddit, Instagram, and TikTok fetchers,
//! classifies every post with a VADER (or keyword lexicon) polarity scorer,
//! mines hashtags, and folds the results into a [`TrendReport`]. Trending
//! product discovery feeds the deduplicated posts to an LLM analyst and
//! falls back to a fixed product list whenever that is not possible. The
//! same analyst estimates demand for new products and forecasts demand for
//! existing ones.
//!
//! [`TrendReport`]: trendsense_core::TrendReport

pub mod analyst;
pub mod classifier;
pub mod error;
pub mod fallback;
pub mod forecast;
pub mod pipeline;
pub mod scorer;
pub mod sources;
pub mod summary;
pub mod topics;
pub mod trending;

pub use analyst::{ChatCompletionsAnalyst, DemandForecaster, TrendAnalyst};
pub use classifier::SentimentClassifier;
pub use error::SignalError;
pub use fallback::fallback_products;
pub use forecast::{estimate_new_product_demand, forecaster_from_config, generate_demand_forecast};
pub use pipeline::{analyze_social_trends, Aggregator};
pub use scorer::{lexicon_score, LexiconScorer, PolarityScorer, VaderScorer};
pub use sources::{
    fetch_fail_open, FetchBatch, FetchOptions, FetcherRegistry, InstagramFetcher, PlatformFetcher,
    RedditFetcher, TikTokFetcher, TwitterFetcher,
};
pub use summary::summarize;
pub use topics::extract_topics;
pub use trending::{get_trending_products, TrendingProducts};

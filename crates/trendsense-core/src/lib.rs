//! Shared domain types and configuration for TrendSense.

pub mod app_config;
pub mod config;
pub mod forecast;
pub mod platform;
pub mod products;
pub mod social;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, PlatformCredentials, ScorerKind};
pub use config::{load_app_config, load_app_config_from_env, DEFAULT_TRENDING_TOPICS};
pub use forecast::{
    BlankField, DemandForecast, DemandForecastInput, NewProductDemandEstimate,
    NewProductDemandInput,
};
pub use platform::{parse_platform_list, ParsePlatformError, Platform};
pub use products::{InventoryStatus, Product, ProductReview};
pub use social::{
    Classification, SentimentLabel, SentimentTally, SocialPost, SourceStatus, TrendReport,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

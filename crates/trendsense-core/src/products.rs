use serde::{Deserialize, Serialize};

use crate::platform::Platform;
use crate::social::SocialPost;

/// Stocking recommendation derived from a product's trend trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryStatus {
    /// Established trend, demand matches supply.
    Optimal,
    /// Fading trend.
    Overstock,
    /// New, fast-growing trend.
    Understock,
}

/// A social post cited as evidence for a product trend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductReview {
    pub platform: Platform,
    pub text: String,
    pub username: String,
    pub post_url: String,
}

impl From<&SocialPost> for ProductReview {
    fn from(post: &SocialPost) -> Self {
        Self {
            platform: post.platform,
            text: post.text.clone(),
            username: post.author.clone(),
            post_url: post.permalink.clone(),
        }
    }
}

/// A trending product with its demand estimate, as rendered by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    /// Estimated weekly unit demand.
    pub forecasted_demand: u32,
    pub inventory_status: InventoryStatus,
    /// Human-readable freshness, e.g. `"Just now"`.
    pub last_updated: String,
    pub image_url: String,
    #[serde(default)]
    pub reviews: Vec<ProductReview>,
}

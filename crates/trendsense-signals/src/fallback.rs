//! Fixed product list served whenever live trend discovery cannot run.

use trendsense_core::{InventoryStatus, Platform, Product, ProductReview};

const FALLBACK_UPDATED: &str = "Generated by AI";
const FALLBACK_IMAGE: &str = "https://placehold.co/64x64";

fn review(platform: Platform, text: &str, username: &str, post_url: &str) -> ProductReview {
    ProductReview {
        platform,
        text: text.to_string(),
        username: username.to_string(),
        post_url: post_url.to_string(),
    }
}

fn product(
    id: &str,
    name: &str,
    category: &str,
    forecasted_demand: u32,
    inventory_status: InventoryStatus,
    reviews: Vec<ProductReview>,
) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        forecasted_demand,
        inventory_status,
        last_updated: FALLBACK_UPDATED.to_string(),
        image_url: FALLBACK_IMAGE.to_string(),
        reviews,
    }
}

#[must_use]
pub fn fallback_products() -> Vec<Product> {
    vec![
        product(
            "fallback-001",
            "Smart Water Bottle",
            "Home Goods",
            1500,
            InventoryStatus::Understock,
            vec![
                review(
                    Platform::Instagram,
                    "Just got this smart water bottle and it is a game changer for my hydration goals! #smartbottle #healthyliving",
                    "health_guru_123",
                    "https://www.instagram.com/p/C9_8y7xSj8A/",
                ),
                review(
                    Platform::TikTok,
                    "This bottle literally nags me to drink water. 10/10 would recommend. #techtok #hydration",
                    "gadgetgirl",
                    "https://www.tiktok.com",
                ),
            ],
        ),
        product(
            "fallback-002",
            "Noise-Cancelling Headphones",
            "Electronics",
            950,
            InventoryStatus::Optimal,
            vec![
                review(
                    Platform::Twitter,
                    "Finally got my hands on these headphones. The noise cancellation is unreal!",
                    "musiclover_xyz",
                    "https://twitter.com/Interior/status/1788574945131",
                ),
                review(
                    Platform::Reddit,
                    "r/headphones - After a month of use, I can say these are worth the hype. Great for studying.",
                    "studentlife",
                    "https://www.reddit.com",
                ),
            ],
        ),
        product(
            "fallback-003",
            "Linen Summer Dress",
            "Apparel",
            700,
            InventoryStatus::Optimal,
            vec![review(
                Platform::Instagram,
                "This linen dress is my summer uniform. So breezy and chic! #summerfashion",
                "style_by_jane",
                "https://www.instagram.com/p/C9-Xv9JRot_/",
            )],
        ),
        product(
            "fallback-004",
            "Vitamin C Serum",
            "Beauty",
            2100,
            InventoryStatus::Understock,
            vec![
                review(
                    Platform::Instagram,
                    "My skin has never been brighter since I started using this Vitamin C serum. A must have!",
                    "skincare_addict",
                    "https://www.instagram.com/p/C-B8bYdRLhY/",
                ),
                review(
                    Platform::TikTok,
                    "Look at that glow! All thanks to this amazing serum. #vitaminc #skincareroutine",
                    "glowup_guide",
                    "https://www.tiktok.com",
                ),
            ],
        ),
        product(
            "fallback-005",
            "Portable Blender",
            "Groceries",
            1100,
            InventoryStatus::Overstock,
            vec![review(
                Platform::Twitter,
                "Making smoothies on the go has never been easier with my new portable blender!",
                "fitlife_frank",
                "https://twitter.com",
            )],
        ),
    ]
}

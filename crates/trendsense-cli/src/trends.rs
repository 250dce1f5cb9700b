//! `analyze` and `trending` command handlers.

use trendsense_core::{Platform, Product, TrendReport};
use trendsense_signals::{
    analyze_social_trends, get_trending_products, Aggregator, TrendingProducts,
};

/// Aggregate social trends for `product` and print them.
///
/// # Errors
///
/// Returns an error if `product` is blank or JSON encoding fails.
pub(crate) async fn run_analyze(
    aggregator: &Aggregator,
    product: &str,
    platforms: &[Platform],
    json: bool,
) -> anyhow::Result<()> {
    let product = product.trim();
    if product.is_empty() {
        anyhow::bail!("product must not be blank");
    }

    let platforms = (!platforms.is_empty()).then_some(platforms);
    let report = analyze_social_trends(aggregator, product, platforms).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render_report(product, &report));
    }
    Ok(())
}

/// Discover trending products and print them.
///
/// # Errors
///
/// Returns an error if JSON encoding fails.
pub(crate) async fn run_trending(trending: &TrendingProducts, json: bool) -> anyhow::Result<()> {
    let products = get_trending_products(trending).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&products)?);
    } else {
        println!("{}", render_products(&products));
    }
    Ok(())
}

pub(crate) fn render_report(product: &str, report: &TrendReport) -> String {
    let mut lines = vec![
        format!("Social trends for \"{product}\""),
        format!("Overall sentiment: {}", report.overall_sentiment),
        format!("Volume: {} posts", report.volume),
    ];

    if report.trending_topics.is_empty() {
        lines.push("Trending topics: none".to_string());
    } else {
        let tags: Vec<String> = report
            .trending_topics
            .iter()
            .map(|t| format!("#{t}"))
            .collect();
        lines.push(format!("Trending topics: {}", tags.join(", ")));
    }

    lines.push(String::new());
    lines.push(format!(
        "{:<10} {:>8} {:>8} {:>8}  {}",
        "platform", "positive", "negative", "neutral", "source"
    ));
    for (platform, tally) in &report.sentiment_breakdown {
        let status = report
            .source_status
            .get(platform)
            .map_or("-", |s| s.as_str());
        lines.push(format!(
            "{:<10} {:>8} {:>8} {:>8}  {}",
            platform.as_str(),
            tally.positive,
            tally.negative,
            tally.neutral,
            status
        ));
    }

    if report.is_degraded() {
        lines.push(String::new());
        lines.push("note: some platforms did not return live data".to_string());
    }

    lines.join("\n")
}

pub(crate) fn render_products(products: &[Product]) -> String {
    let mut lines = Vec::new();
    for product in products {
        lines.push(format!(
            "[{}] {} ({})",
            product.id, product.name, product.category
        ));
        lines.push(format!(
            "    demand {}/week, inventory {:?}, updated {}",
            product.forecasted_demand, product.inventory_status, product.last_updated
        ));
        for review in &product.reviews {
            lines.push(format!(
                "    - {} @{}: {}",
                review.platform, review.username, review.text
            ));
        }
    }
    lines.join("\n")
}

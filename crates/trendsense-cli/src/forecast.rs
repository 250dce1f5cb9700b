//! Demand forecasting command handlers for the CLI.

use clap::Subcommand;
use trendsense_core::{
    DemandForecastInput, NewProductDemandEstimate, NewProductDemandInput, TrendReport,
};
use trendsense_signals::{
    analyze_social_trends, estimate_new_product_demand, generate_demand_forecast, Aggregator,
    DemandForecaster,
};

/// Sub-commands available under `forecast`.
#[derive(Debug, Subcommand)]
pub enum ForecastCommands {
    /// Estimate weekly demand for a product with no sales history
    NewProduct {
        /// Name of the new product
        name: String,

        /// Comparable products with sales history (comma-separated or repeated)
        #[arg(long, value_delimiter = ',')]
        similar: Vec<String>,

        /// Social media trend summary; defaults to a live analysis of NAME
        #[arg(long)]
        trends: Option<String>,

        /// Point of sale data for the similar products
        #[arg(long)]
        pos: Option<String>,

        /// Weather data for the relevant locations
        #[arg(long)]
        weather: Option<String>,

        /// Location data for the stores
        #[arg(long)]
        location: Option<String>,

        /// Print the estimate as JSON
        #[arg(long)]
        json: bool,
    },
    /// Forecast demand for an existing product
    Demand {
        /// Product to forecast
        product: String,

        /// Social media trend summary; defaults to a live analysis of PRODUCT
        #[arg(long)]
        trends: Option<String>,

        /// Historical sales data for the product
        #[arg(long, default_value = "")]
        sales: String,

        /// Weather data for the location
        #[arg(long, default_value = "")]
        weather: String,

        /// Location data for the product
        #[arg(long, default_value = "")]
        location: String,

        /// Print the forecast as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Run a `forecast` sub-command.
///
/// # Errors
///
/// Returns an error if no forecaster is configured, the input is invalid,
/// or the forecaster fails.
pub(crate) async fn run_forecast(
    command: ForecastCommands,
    aggregator: &Aggregator,
    forecaster: Option<&dyn DemandForecaster>,
) -> anyhow::Result<()> {
    let forecaster = forecaster.ok_or_else(|| {
        anyhow::anyhow!("demand forecasting requires TRENDSENSE_ANALYST_URL to be set")
    })?;

    match command {
        ForecastCommands::NewProduct {
            name,
            similar,
            trends,
            pos,
            weather,
            location,
            json,
        } => {
            let social_media_trends = match trends {
                Some(t) => t,
                None => live_trends(aggregator, &name).await,
            };
            let input = NewProductDemandInput {
                new_product_name: name,
                similar_product_names: similar,
                social_media_trends,
                pos_data: pos,
                weather_data: weather,
                location_data: location,
            };
            let estimate = estimate_new_product_demand(forecaster, &input).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&estimate)?);
            } else {
                println!("{}", render_estimate(&input.new_product_name, &estimate));
            }
        }
        ForecastCommands::Demand {
            product,
            trends,
            sales,
            weather,
            location,
            json,
        } => {
            let social_media_trends = match trends {
                Some(t) => t,
                None => live_trends(aggregator, &product).await,
            };
            let input = DemandForecastInput {
                product_name: product,
                social_media_trends,
                historical_sales_data: sales,
                weather_data: weather,
                location_data: location,
            };
            let forecast = generate_demand_forecast(forecaster, &input).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&forecast)?);
            } else {
                println!("Demand forecast for \"{}\"", input.product_name.trim());
                println!("{}", forecast.demand_forecast);
            }
        }
    }
    Ok(())
}

async fn live_trends(aggregator: &Aggregator, product: &str) -> String {
    if product.trim().is_empty() {
        return String::new();
    }
    let report = analyze_social_trends(aggregator, product.trim(), None).await;
    describe_trends(&report)
}

/// One-line trend summary used as forecaster input.
pub(crate) fn describe_trends(report: &TrendReport) -> String {
    if report.volume == 0 {
        return "no recent social media posts found".to_string();
    }
    let mut summary = format!(
        "{} recent posts, overall {}",
        report.volume, report.overall_sentiment
    );
    for (platform, tally) in &report.sentiment_breakdown {
        if tally.total() > 0 {
            summary.push_str(&format!(
                "; {platform}: {} positive, {} negative, {} neutral",
                tally.positive, tally.negative, tally.neutral
            ));
        }
    }
    if !report.trending_topics.is_empty() {
        let tags: Vec<String> = report
            .trending_topics
            .iter()
            .map(|t| format!("#{t}"))
            .collect();
        summary.push_str(&format!("; trending hashtags: {}", tags.join(", ")));
    }
    summary
}

pub(crate) fn render_estimate(name: &str, estimate: &NewProductDemandEstimate) -> String {
    format!(
        "Estimated demand for \"{}\": {:.0} units/week\n{}",
        name.trim(),
        estimate.estimated_demand,
        estimate.explanation
    )
}

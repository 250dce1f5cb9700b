mod forecast;
mod trends;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use trendsense_core::Platform;
use trendsense_signals::{forecaster_from_config, Aggregator, TrendingProducts};

use crate::forecast::ForecastCommands;

#[derive(Debug, Parser)]
#[command(name = "trendsense")]
#[command(about = "Social trend and demand signals from Twitter/X, Reddit, Instagram and TikTok")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Aggregate social sentiment and hashtags for a product
    Analyze {
        /// Product or subject to search for
        product: String,

        /// Restrict to these platforms (comma-separated or repeated)
        #[arg(long = "platform", value_delimiter = ',')]
        platforms: Vec<Platform>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Discover trending products across the configured seed topics
    Trending {
        /// Print the products as JSON
        #[arg(long)]
        json: bool,
    },
    /// LLM demand estimates and forecasts
    Forecast {
        #[command(subcommand)]
        command: ForecastCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = trendsense_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let aggregator = Arc::new(Aggregator::from_config(&config)?);

    match cli.command {
        Commands::Analyze {
            product,
            platforms,
            json,
        } => trends::run_analyze(&aggregator, &product, &platforms, json).await,
        Commands::Trending { json } => {
            let trending = TrendingProducts::from_config(&config, aggregator)?;
            trends::run_trending(&trending, json).await
        }
        Commands::Forecast { command } => {
            let forecaster = forecaster_from_config(&config)?;
            forecast::run_forecast(command, &aggregator, forecaster.as_deref()).await
        }
    }
}

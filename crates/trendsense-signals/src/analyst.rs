//! LLM analyst over an OpenAI-compatible chat completions endpoint.
//!
//! One client serves three JSON-mode flows: trending product discovery,
//! demand estimation for new products, and demand forecasts for existing
//! ones.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use trendsense_core::{
    AppConfig, DemandForecast, DemandForecastInput, NewProductDemandEstimate,
    NewProductDemandInput, Product, ProductReview, SocialPost,
};

use crate::error::SignalError;

const SYSTEM_PROMPT: &str = "You are the analysis engine of TrendSense, a retail demand-forecasting \
platform. You receive a JSON array of recent social media posts from Instagram, Twitter, Reddit, \
and TikTok. Identify up to 10 of the most relevant and impactful product trends. More mentions \
with positive sentiment means higher demand.

For each product provide:
- id: a unique id such as prod-001
- name: the specific product name
- category: a plausible retail category (Home Goods, Electronics, Apparel, Beauty, Groceries, Toys)
- forecastedDemand: forecast weekly unit demand as a non-negative integer
- inventoryStatus: Understock for new explosive trends, Optimal for established trends, \
Overstock for fading trends
- lastUpdated: the string \"Just now\"
- imageUrl: a https://placehold.co/64x64 placeholder
- reviews: 2-3 posts from the data that justify the trend, each with platform, text, username, \
and postUrl copied exactly from the source data

Respond with a single JSON object of the form {\"products\": [...]}.";

const NEW_PRODUCT_PROMPT: &str = "You are an expert in demand forecasting, especially for new \
products with no prior sales history. Use transfer learning: lean on the sales history of the \
similar products and on the current social media trends to estimate weekly unit demand for the \
new product. Point of sale, weather, and location data are included when available. Be \
conservative in your estimate.

Respond with a single JSON object of the form \
{\"estimatedDemand\": <weekly units as a non-negative number>, \
\"explanation\": \"<how the estimate was reached>\"}.";

const FORECAST_PROMPT: &str = "You are an expert demand forecaster. Generate a demand forecast \
for the product you are given, incorporating its social media trends, historical sales data, \
weather data, and location data.

Respond with a single JSON object of the form {\"demandForecast\": \"<the forecast>\"}.";

/// Turns a deduplicated post dataset into a list of trending products.
#[async_trait]
pub trait TrendAnalyst: Send + Sync {
    /// # Errors
    ///
    /// Returns [`SignalError`] when the analyst is unreachable or its answer
    /// cannot be parsed.
    async fn identify_trends(&self, posts: &[SocialPost]) -> Result<Vec<Product>, SignalError>;
}

/// Demand estimates and forecasts for individual products.
#[async_trait]
pub trait DemandForecaster: Send + Sync {
    /// # Errors
    ///
    /// Returns [`SignalError`] when the forecaster is unreachable or its
    /// answer cannot be parsed.
    async fn estimate_new_product_demand(
        &self,
        input: &NewProductDemandInput,
    ) -> Result<NewProductDemandEstimate, SignalError>;

    /// # Errors
    ///
    /// Returns [`SignalError`] when the forecaster is unreachable or its
    /// answer cannot be parsed.
    async fn generate_demand_forecast(
        &self,
        input: &DemandForecastInput,
    ) -> Result<DemandForecast, SignalError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    response_format: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProductList {
    #[serde(default)]
    products: Vec<Product>,
}

/// Analyst backed by any OpenAI-compatible `/chat/completions` API.
pub struct ChatCompletionsAnalyst {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl ChatCompletionsAnalyst {
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        api_key: Option<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.into(),
        }
    }

    /// `None` when `TRENDSENSE_ANALYST_URL` is not configured.
    #[must_use]
    pub fn from_config(config: &AppConfig, client: reqwest::Client) -> Option<Self> {
        let base_url = config.analyst_url.as_deref()?;
        Some(Self::new(
            client,
            base_url,
            config.analyst_api_key.clone(),
            config.analyst_model.clone(),
        ))
    }
}

impl std::fmt::Debug for ChatCompletionsAnalyst {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsAnalyst")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl ChatCompletionsAnalyst {
    /// Sends one system + user exchange in JSON mode and returns the raw
    /// response body.
    async fn complete(&self, system: &str, user: String) -> Result<String, SignalError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            response_format: json!({ "type": "json_object" }),
        };

        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&request);
        if let Some(key) = self.api_key.as_deref() {
            builder = builder.bearer_auth(key);
        }
        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SignalError::Analyst(format!(
                "chat completions returned HTTP {status}"
            )));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl TrendAnalyst for ChatCompletionsAnalyst {
    async fn identify_trends(&self, posts: &[SocialPost]) -> Result<Vec<Product>, SignalError> {
        let dataset = build_dataset(posts)?;
        let body = self
            .complete(SYSTEM_PROMPT, format!("Social media data:\n{dataset}"))
            .await?;
        parse_products(&body)
    }
}

#[async_trait]
impl DemandForecaster for ChatCompletionsAnalyst {
    async fn estimate_new_product_demand(
        &self,
        input: &NewProductDemandInput,
    ) -> Result<NewProductDemandEstimate, SignalError> {
        let body = self
            .complete(NEW_PRODUCT_PROMPT, new_product_message(input))
            .await?;
        parse_estimate(&body)
    }

    async fn generate_demand_forecast(
        &self,
        input: &DemandForecastInput,
    ) -> Result<DemandForecast, SignalError> {
        let body = self.complete(FORECAST_PROMPT, forecast_message(input)).await?;
        parse_forecast(&body)
    }
}

fn new_product_message(input: &NewProductDemandInput) -> String {
    let similar = if input.similar_product_names.is_empty() {
        "none".to_string()
    } else {
        input.similar_product_names.join(", ")
    };
    format!(
        "New Product Name: {}\nSimilar Products: {similar}\nSocial Media Trends: {}\n\
         POS Data: {}\nWeather Data: {}\nLocation Data: {}",
        input.new_product_name.trim(),
        input.social_media_trends.trim(),
        or_unavailable(input.pos_data.as_deref()),
        or_unavailable(input.weather_data.as_deref()),
        or_unavailable(input.location_data.as_deref()),
    )
}

fn forecast_message(input: &DemandForecastInput) -> String {
    format!(
        "Product Name: {}\nSocial Media Trends: {}\nHistorical Sales Data: {}\n\
         Weather Data: {}\nLocation Data: {}",
        input.product_name.trim(),
        input.social_media_trends.trim(),
        or_unavailable(Some(input.historical_sales_data.as_str())),
        or_unavailable(Some(input.weather_data.as_str())),
        or_unavailable(Some(input.location_data.as_str())),
    )
}

fn or_unavailable(value: Option<&str>) -> &str {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("not available")
}

/// Posts rendered in the same shape the analyst must echo back as reviews.
pub(crate) fn build_dataset(posts: &[SocialPost]) -> Result<String, SignalError> {
    let reviews: Vec<ProductReview> = posts.iter().map(ProductReview::from).collect();
    serde_json::to_string_pretty(&reviews)
        .map_err(|e| SignalError::Analyst(format!("failed to encode dataset: {e}")))
}

/// Decodes the first choice's content as `T`. `what` names the answer in
/// error messages.
fn parse_answer<T: DeserializeOwned>(body: &str, what: &str) -> Result<T, SignalError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| SignalError::Analyst(format!("malformed chat response: {e}")))?;
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| SignalError::Analyst("chat response had no content".to_string()))?;
    serde_json::from_str(strip_code_fence(&content))
        .map_err(|e| SignalError::Analyst(format!("{what} did not parse: {e}")))
}

fn parse_products(body: &str) -> Result<Vec<Product>, SignalError> {
    parse_answer::<ProductList>(body, "product list").map(|list| list.products)
}

fn parse_estimate(body: &str) -> Result<NewProductDemandEstimate, SignalError> {
    let estimate: NewProductDemandEstimate = parse_answer(body, "demand estimate")?;
    if !estimate.estimated_demand.is_finite() || estimate.estimated_demand < 0.0 {
        return Err(SignalError::Analyst(format!(
            "demand estimate out of range: {}",
            estimate.estimated_demand
        )));
    }
    Ok(estimate)
}

fn parse_forecast(body: &str) -> Result<DemandForecast, SignalError> {
    let forecast: DemandForecast = parse_answer(body, "demand forecast")?;
    if forecast.demand_forecast.trim().is_empty() {
        return Err(SignalError::Analyst("demand forecast was empty".to_string()));
    }
    Ok(forecast)
}

/// Some models wrap JSON answers in a Markdown code fence.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

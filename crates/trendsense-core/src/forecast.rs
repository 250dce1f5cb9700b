//! Inputs and answers for the LLM demand flows.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A required free-text field was blank.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{0}` must not be blank")]
pub struct BlankField(pub &'static str);

/// Demand estimate request for a product with no sales history of its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProductDemandInput {
    pub new_product_name: String,
    /// Comparable products whose sales history the estimate borrows from.
    #[serde(default)]
    pub similar_product_names: Vec<String>,
    pub social_media_trends: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProductDemandEstimate {
    /// Estimated weekly units.
    pub estimated_demand: f64,
    pub explanation: String,
}

/// Forecast request for an existing product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemandForecastInput {
    pub product_name: String,
    pub social_media_trends: String,
    #[serde(default)]
    pub historical_sales_data: String,
    #[serde(default)]
    pub weather_data: String,
    #[serde(default)]
    pub location_data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemandForecast {
    pub demand_forecast: String,
}

impl NewProductDemandInput {
    /// # Errors
    ///
    /// Returns [`BlankField`] naming the first blank required field.
    pub fn validate(&self) -> Result<(), BlankField> {
        require("newProductName", &self.new_product_name)?;
        require("socialMediaTrends", &self.social_media_trends)
    }
}

impl DemandForecastInput {
    /// # Errors
    ///
    /// Returns [`BlankField`] naming the first blank required field.
    pub fn validate(&self) -> Result<(), BlankField> {
        require("productName", &self.product_name)?;
        require("socialMediaTrends", &self.social_media_trends)
    }
}

fn require(field: &'static str, value: &str) -> Result<(), BlankField> {
    if value.trim().is_empty() {
        Err(BlankField(field))
    } else {
        Ok(())
    }
}

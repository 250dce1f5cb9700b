//! Demand estimation and forecasting entry points.
//!
//! Unlike trending discovery these flows have no fallback data: a missing
//! or failing forecaster is an error the caller must surface.

use std::sync::Arc;

use trendsense_core::{
    AppConfig, DemandForecast, DemandForecastInput, NewProductDemandEstimate,
    NewProductDemandInput,
};

use crate::analyst::{ChatCompletionsAnalyst, DemandForecaster};
use crate::error::SignalError;
use crate::sources::build_http_client;

/// The configured forecaster, or `None` when `TRENDSENSE_ANALYST_URL` is unset.
///
/// # Errors
///
/// Returns [`SignalError::Http`] if the HTTP client cannot be built.
pub fn forecaster_from_config(
    config: &AppConfig,
) -> Result<Option<Arc<dyn DemandForecaster>>, SignalError> {
    let forecaster = ChatCompletionsAnalyst::from_config(config, build_http_client(config)?)
        .map(|a| Arc::new(a) as Arc<dyn DemandForecaster>);
    if forecaster.is_none() {
        tracing::info!("no analyst configured, demand forecasting is unavailable");
    }
    Ok(forecaster)
}

/// Estimate weekly demand for a product with no sales history.
///
/// # Errors
///
/// Returns [`SignalError::InvalidInput`] for a blank product name or trend
/// summary, otherwise whatever the forecaster reports.
pub async fn estimate_new_product_demand(
    forecaster: &dyn DemandForecaster,
    input: &NewProductDemandInput,
) -> Result<NewProductDemandEstimate, SignalError> {
    input.validate()?;
    tracing::info!(
        product = %input.new_product_name.trim(),
        similar = input.similar_product_names.len(),
        "estimating new product demand"
    );
    let estimate = forecaster.estimate_new_product_demand(input).await?;
    tracing::info!(
        product = %input.new_product_name.trim(),
        estimated_demand = estimate.estimated_demand,
        "demand estimate ready"
    );
    Ok(estimate)
}

/// Forecast demand for an existing product.
///
/// # Errors
///
/// Returns [`SignalError::InvalidInput`] for a blank product name or trend
/// summary, otherwise whatever the forecaster reports.
pub async fn generate_demand_forecast(
    forecaster: &dyn DemandForecaster,
    input: &DemandForecastInput,
) -> Result<DemandForecast, SignalError> {
    input.validate()?;
    tracing::info!(product = %input.product_name.trim(), "generating demand forecast");
    forecaster.generate_demand_forecast(input).await
}

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use trendsense_core::{
    DemandForecast, DemandForecastInput, NewProductDemandEstimate, NewProductDemandInput,
};
use trendsense_signals::{
    estimate_new_product_demand, generate_demand_forecast, DemandForecaster, SignalError,
};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

fn require_forecaster(
    state: &AppState,
    request_id: &str,
) -> Result<Arc<dyn DemandForecaster>, ApiError> {
    state.forecaster.clone().ok_or_else(|| {
        ApiError::new(
            request_id,
            "unavailable",
            "demand forecasting requires TRENDSENSE_ANALYST_URL",
        )
    })
}

fn map_forecast_error(request_id: &str, error: &SignalError) -> ApiError {
    if let SignalError::InvalidInput(blank) = error {
        return ApiError::new(request_id, "validation_error", blank.to_string());
    }
    tracing::warn!(error = %error, "demand forecaster failed");
    ApiError::new(request_id, "upstream_error", "demand forecaster failed")
}

/// POST /api/v1/forecast/new-product
pub(super) async fn estimate_new_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(input): Json<NewProductDemandInput>,
) -> Result<Json<ApiResponse<NewProductDemandEstimate>>, ApiError> {
    let forecaster = require_forecaster(&state, &req_id.0)?;
    let estimate = estimate_new_product_demand(forecaster.as_ref(), &input)
        .await
        .map_err(|e| map_forecast_error(&req_id.0, &e))?;

    Ok(Json(ApiResponse {
        data: estimate,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/forecast/demand
pub(super) async fn forecast_demand(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(input): Json<DemandForecastInput>,
) -> Result<Json<ApiResponse<DemandForecast>>, ApiError> {
    let forecaster = require_forecaster(&state, &req_id.0)?;
    let forecast = generate_demand_forecast(forecaster.as_ref(), &input)
        .await
        .map_err(|e| map_forecast_error(&req_id.0, &e))?;

    Ok(Json(ApiResponse {
        data: forecast,
        meta: ResponseMeta::new(req_id.0),
    }))
}

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use trendsense_core::{parse_platform_list, Platform, Product, TrendReport};
use trendsense_signals::analyze_social_trends;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzeQuery {
    pub product: Option<String>,
    /// Comma-separated platform names; absent or blank means all platforms.
    pub platforms: Option<String>,
}

pub(super) async fn analyze_trends(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<AnalyzeQuery>,
) -> Result<Json<ApiResponse<TrendReport>>, ApiError> {
    let product = query.product.as_deref().map(str::trim).unwrap_or_default();
    if product.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "query parameter `product` must not be blank",
        ));
    }

    let platforms: Option<Vec<Platform>> = match query.platforms.as_deref() {
        None => None,
        Some(raw) => {
            let parsed = parse_platform_list(raw)
                .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;
            Some(parsed).filter(|p| !p.is_empty())
        }
    };

    let report = analyze_social_trends(&state.aggregator, product, platforms.as_deref()).await;

    Ok(Json(ApiResponse {
        data: report,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn list_trending_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<Product>>> {
    let products = state.trending.get().await;
    Json(ApiResponse {
        data: products,
        meta: ResponseMeta::new(req_id.0),
    })
}

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;
use std::sync::Arc;

use crate::{ApiError, AppState, ClimateQuery, ClimateRequest, ErrorBody, TrendPoint};

#[utoipa::path(
    post,
    path = "/historical-chart",
    request_body = ClimateRequest,
    responses(
        (status = OK, description = "Mean max temperature of the date's ISO week for up to the 20 most recent years", body = Vec<TrendPoint>),
        (status = BAD_REQUEST, description = "Missing city or date, or a malformed date", body = ErrorBody),
        (status = NOT_FOUND, description = "Unknown city, or no records for that week", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Unexpected failure", body = ErrorBody)
    ))]
pub async fn historical_chart(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Vec<TrendPoint>>, ApiError> {
    let query = ClimateQuery::from_payload(payload)?;
    let trend = state.engine.chart_data(&query.city, query.date)?;
    Ok(Json(trend))
}

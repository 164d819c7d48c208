use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{ApiError, AppState, ClimateQuery, ClimateRequest, ErrorBody, HistoricalStatistics};

#[derive(Debug, Serialize, ToSchema)]
pub struct PredictResponse {
    pub statistics: HistoricalStatistics,
    pub summary: String,
}

#[utoipa::path(
    post,
    path = "/predict",
    request_body = ClimateRequest,
    responses(
        (status = OK, description = "Statistics for the calendar day across all years, with a narrative summary", body = PredictResponse),
        (status = BAD_REQUEST, description = "Missing city or date, or a malformed date", body = ErrorBody),
        (status = NOT_FOUND, description = "Unknown city, or no records for that calendar day", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Unexpected failure", body = ErrorBody)
    ))]
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let query = ClimateQuery::from_payload(payload)?;
    let statistics = state.engine.historical_analysis(
        &query.city,
        u8::from(query.date.month()),
        query.date.day(),
    )?;
    let summary = state.summarizer.summarize(&statistics).await;

    Ok(Json(PredictResponse {
        statistics,
        summary,
    }))
}

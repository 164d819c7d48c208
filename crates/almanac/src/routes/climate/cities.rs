use axum::{extract::State, Json};
use std::sync::Arc;

use crate::AppState;

#[utoipa::path(
    get,
    path = "/cities",
    responses(
        (status = OK, description = "Cities available in the dataset, sorted", body = Vec<String>)
    ))]
pub async fn cities(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.engine.cities())
}

use crate::{
    cities, historical_chart, predict, routes, ClimateEngine, GeminiSummarizer,
    HistoricalStatistics, Summarizer, SummaryConfig, TrendPoint,
};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use hyper::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use log::info;
use std::{path::Path, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ClimateEngine>,
    pub summarizer: Arc<dyn Summarizer>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::climate::predict::predict,
        routes::climate::historical_chart::historical_chart,
        routes::climate::cities::cities,
    ),
    components(
        schemas(
                HistoricalStatistics,
                TrendPoint,
                routes::climate::request::ClimateRequest,
                routes::climate::request::ErrorBody,
                routes::climate::predict::PredictResponse,
            )
    ),
    tags(
        (name = "india climate almanac api", description = "a RESTful api answering what the weather is usually like in an Indian city on a given day")
    )
)]
struct ApiDoc;

/// Loads the dataset into memory and wires up the summary client.
pub fn build_app_state(dataset: &Path, summary: SummaryConfig) -> Result<AppState, anyhow::Error> {
    let engine = ClimateEngine::load(dataset)
        .map_err(|e| anyhow!("error loading dataset {}: {}", dataset.display(), e))?;

    let summarizer = GeminiSummarizer::new(summary)
        .map_err(|e| anyhow!("error setting up summary client: {}", e))?;

    Ok(AppState {
        engine: Arc::new(engine),
        summarizer: Arc::new(summarizer),
    })
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/predict", post(predict))
        .route("/historical-chart", post(historical_chart))
        .route("/cities", get(cities))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default();
    info!(target: "http_request","new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, code: {}, time: {}", response.status().as_str(), response_time);

    response
}

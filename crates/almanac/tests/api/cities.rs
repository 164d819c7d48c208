use crate::helpers::{kochi_july_records, spawn_app, MockSummarizer};
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn lists_sorted_canonical_cities() {
    let mut records = kochi_july_records();
    for record in records.iter_mut().filter(|r| r.city == "Delhi") {
        record.city = String::from("  new   delhi ");
    }
    let test_app = spawn_app(records, MockSummarizer::new()).await;

    let (status, body) = test_app.get("/cities").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["Kochi", "New Delhi"]));
}

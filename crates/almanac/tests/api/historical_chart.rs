use crate::helpers::{kochi_summer_records, record, spawn_app, MockSummarizer};
use axum::http::StatusCode;
use serde_json::{json, Value};
use time::macros::date;

#[tokio::test]
async fn chart_covers_the_most_recent_twenty_years() {
    let test_app = spawn_app(kochi_summer_records(), MockSummarizer::new()).await;

    let (status, body) = test_app
        .post_json(
            "/historical-chart",
            json!({"city": "Kochi", "date": "2024-08-05"}).to_string(),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let points = body.as_array().unwrap();
    assert_eq!(points.len(), 20);

    let years: Vec<i64> = points.iter().map(|p| p["year"].as_i64().unwrap()).collect();
    assert!(years.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(years.first(), Some(&2005));
    assert_eq!(years.last(), Some(&2024));

    assert_eq!(points[0], json!({"year": 2005, "avg_temp": 30.5}));
    assert_eq!(points[19], json!({"year": 2024, "avg_temp": 40.0}));
}

#[tokio::test]
async fn chart_averages_the_iso_week() {
    // 2024-08-05 is the Monday of ISO week 32; 2024-08-12 starts week 33
    let records = vec![
        record("Pune", date!(2023 - 08 - 07), Some(30.0), None, None),
        record("Pune", date!(2023 - 08 - 13), Some(31.0), None, None),
        record("Pune", date!(2023 - 08 - 14), Some(50.0), None, None),
        record("Pune", date!(2024 - 08 - 06), Some(28.25), None, None),
        record("Pune", date!(2024 - 08 - 07), None, None, None),
    ];
    let test_app = spawn_app(records, MockSummarizer::new()).await;

    let (status, body) = test_app
        .post_json(
            "/historical-chart",
            json!({"city": "pune", "date": "2024-08-05"}).to_string(),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"year": 2023, "avg_temp": 30.5},
            {"year": 2024, "avg_temp": 28.2}
        ])
    );
}

#[tokio::test]
async fn chart_year_without_readings_has_null_average() {
    let records = vec![
        record("Pune", date!(2022 - 08 - 08), None, Some(20.0), None),
        record("Pune", date!(2023 - 08 - 07), Some(30.0), None, None),
    ];
    let test_app = spawn_app(records, MockSummarizer::new()).await;

    let (status, body) = test_app
        .post_json(
            "/historical-chart",
            json!({"city": "Pune", "date": "2024-08-05"}).to_string(),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0], json!({"year": 2022, "avg_temp": Value::Null}));
    assert_eq!(body[1], json!({"year": 2023, "avg_temp": 30.0}));
}

#[tokio::test]
async fn chart_unknown_city_is_not_found() {
    let test_app = spawn_app(kochi_summer_records(), MockSummarizer::new()).await;

    let (status, body) = test_app
        .post_json(
            "/historical-chart",
            json!({"city": "Atlantis", "date": "2024-08-05"}).to_string(),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "City 'Atlantis' not found."}));
}

#[tokio::test]
async fn chart_week_without_records_is_not_found() {
    let test_app = spawn_app(kochi_summer_records(), MockSummarizer::new()).await;

    let (status, body) = test_app
        .post_json(
            "/historical-chart",
            json!({"city": "Kochi", "date": "2024-01-10"}).to_string(),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"error": "Not enough historical data to generate a trend chart."})
    );
}

#[tokio::test]
async fn chart_requires_city_and_date() {
    let test_app = spawn_app(kochi_summer_records(), MockSummarizer::new()).await;

    let (status, body) = test_app
        .post_json("/historical-chart", json!({"city": "Kochi"}).to_string())
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": "Invalid input. 'city' and 'date' are required."})
    );
}

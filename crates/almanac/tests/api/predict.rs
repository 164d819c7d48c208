use crate::helpers::{kochi_july_records, spawn_app, MockSummarizer};
use axum::http::StatusCode;
use serde_json::json;

fn summarizer_returning(text: &'static str) -> MockSummarizer {
    let mut summarizer = MockSummarizer::new();
    summarizer
        .expect_summarize()
        .times(1)
        .returning(move |_| text.to_string());
    summarizer
}

fn silent_summarizer() -> MockSummarizer {
    let mut summarizer = MockSummarizer::new();
    summarizer.expect_summarize().never();
    summarizer
}

#[tokio::test]
async fn predict_returns_statistics_and_summary() {
    let mut summarizer = MockSummarizer::new();
    summarizer
        .expect_summarize()
        .withf(|stats| stats.city == "Kochi" && stats.based_on_years_of_data == 5)
        .times(1)
        .returning(|_| String::from("Expect a warm, often wet day."));
    let test_app = spawn_app(kochi_july_records(), summarizer).await;

    let (status, body) = test_app
        .post_json(
            "/predict",
            json!({"city": "Kochi", "date": "2024-07-15"}).to_string(),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "statistics": {
                "city": "Kochi",
                "date_analyzed": "July 15",
                "based_on_years_of_data": 5,
                "average_max_temp": "30.4°C",
                "average_min_temp": "23.8°C",
                "historical_record_high": "32.0°C",
                "historical_record_low": "22.0°C",
                "chance_of_rain": "40%"
            },
            "summary": "Expect a warm, often wet day."
        })
    );
}

#[tokio::test]
async fn predict_normalizes_city_names() {
    let test_app = spawn_app(kochi_july_records(), summarizer_returning("ok")).await;
    let (_, canonical) = test_app
        .post_json(
            "/predict",
            json!({"city": "Kochi", "date": "2024-07-15"}).to_string(),
        )
        .await;

    let test_app = spawn_app(kochi_july_records(), summarizer_returning("ok")).await;
    let (status, messy) = test_app
        .post_json(
            "/predict",
            json!({"city": "  kochi  ", "date": "2024-07-15"}).to_string(),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(canonical, messy);
}

#[tokio::test]
async fn predict_ignores_the_request_year() {
    let test_app = spawn_app(kochi_july_records(), summarizer_returning("ok")).await;

    let (status, body) = test_app
        .post_json(
            "/predict",
            json!({"city": "Kochi", "date": "1999-07-15T06:30:00"}).to_string(),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["statistics"]["based_on_years_of_data"], json!(5));
}

#[tokio::test]
async fn predict_unknown_city_is_not_found() {
    let test_app = spawn_app(kochi_july_records(), silent_summarizer()).await;

    let (status, body) = test_app
        .post_json(
            "/predict",
            json!({"city": "Atlantis", "date": "2024-07-15"}).to_string(),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "City 'Atlantis' not found."}));
}

#[tokio::test]
async fn predict_day_without_records_is_not_found() {
    let test_app = spawn_app(kochi_july_records(), silent_summarizer()).await;

    let (status, body) = test_app
        .post_json(
            "/predict",
            json!({"city": "Kochi", "date": "2024-02-29"}).to_string(),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("No historical data found for that date"));
}

#[tokio::test]
async fn predict_requires_city_and_date() {
    let test_app = spawn_app(kochi_july_records(), silent_summarizer()).await;

    for payload in [
        json!({"city": "Kochi"}).to_string(),
        json!({"date": "2024-07-15"}).to_string(),
        json!({}).to_string(),
        String::from("{not json"),
    ] {
        let (status, body) = test_app.post_json("/predict", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"error": "Invalid input. 'city' and 'date' are required."})
        );
    }
}

#[tokio::test]
async fn predict_rejects_unparsable_dates() {
    let test_app = spawn_app(kochi_july_records(), silent_summarizer()).await;

    let (status, body) = test_app
        .post_json(
            "/predict",
            json!({"city": "Kochi", "date": "next tuesday"}).to_string(),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("next tuesday"));
}

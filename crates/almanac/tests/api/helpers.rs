use almanac::{app, AppState, ClimateEngine, HistoricalStatistics, Summarizer, WeatherRecord};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use hyper::{header, Method};
use mockall::mock;
use serde_json::Value;
use std::sync::Arc;
use time::{Date, Duration, Month};
use tower::ServiceExt;

mock! {
    pub Summarizer {}
    #[async_trait]
    impl Summarizer for Summarizer {
        async fn summarize(&self, stats: &HistoricalStatistics) -> String;
    }
}

pub struct TestApp {
    pub app: Router,
}

pub async fn spawn_app(records: Vec<WeatherRecord>, summarizer: MockSummarizer) -> TestApp {
    let app_state = AppState {
        engine: Arc::new(ClimateEngine::new(records)),
        summarizer: Arc::new(summarizer),
    };
    TestApp {
        app: app(app_state),
    }
}

impl TestApp {
    pub async fn post_json(&self, uri: &str, body: String) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(header::ACCEPT, "application/json")
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request.");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }
}

pub fn record(
    city: &str,
    date: Date,
    max: Option<f64>,
    min: Option<f64>,
    rain: Option<f64>,
) -> WeatherRecord {
    WeatherRecord {
        city: city.to_owned(),
        date,
        temperature_2m_max: max,
        temperature_2m_min: min,
        precipitation_sum: rain,
        rain_sum: rain,
        wind_speed_10m_max: Some(10.0),
    }
}

/// July 15 for 2019 through 2023 in Kochi, plus a single Delhi row.
/// Max temps average to 30.4 with a record of 32.0, and two of the five
/// days are rainy.
pub fn kochi_july_records() -> Vec<WeatherRecord> {
    let max_temps = [30.0, 31.0, 29.0, 32.0, 30.0];
    let min_temps = [24.0, 23.5, 22.0, 25.0, 24.5];
    let rain = [5.0, 0.0, 0.1, 12.4, 0.0];
    let mut records: Vec<WeatherRecord> = (0..5)
        .map(|i| {
            let date = Date::from_calendar_date(2019 + i as i32, Month::July, 15).unwrap();
            record(
                "Kochi",
                date,
                Some(max_temps[i]),
                Some(min_temps[i]),
                Some(rain[i]),
            )
        })
        .collect();
    records.push(record(
        "Delhi",
        Date::from_calendar_date(2023, Month::July, 15).unwrap(),
        Some(38.0),
        Some(29.0),
        Some(0.0),
    ));
    records
}

/// Every day from July 20 to August 20 for 2000 through 2024. A year's max
/// temperature is constant: 28.0 plus half a degree per year since 2000.
pub fn kochi_summer_records() -> Vec<WeatherRecord> {
    let mut records = vec![];
    for year in 2000..=2024 {
        let max_temp = 28.0 + f64::from(year - 2000) * 0.5;
        let start = Date::from_calendar_date(year, Month::July, 20).unwrap();
        for offset in 0..=31 {
            records.push(record(
                "Kochi",
                start + Duration::days(offset),
                Some(max_temp),
                Some(24.0),
                Some(1.0),
            ));
        }
    }
    records
}

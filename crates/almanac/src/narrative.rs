//! Conversational summaries of [`HistoricalStatistics`] from a hosted
//! text-generation model.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{format_celsius, format_percent, HistoricalStatistics};

pub const DEFAULT_SUMMARY_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_SUMMARY_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_SUMMARY_TIMEOUT_SECS: u64 = 30;

/// Prefix of the text returned in place of a summary when generation fails
pub const SUMMARY_FAILURE_PREFIX: &str = "Could not generate AI summary. Error: ";

#[derive(thiserror::Error, Debug)]
pub enum SummaryError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("service responded with status {0}")]
    Status(StatusCode),
    #[error("response contained no text")]
    EmptyResponse,
}

/// Turns statistics into prose. Implementations never fail: problems are
/// reported inside the returned text.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, stats: &HistoricalStatistics) -> String;
}

pub fn build_prompt(stats: &HistoricalStatistics) -> String {
    format!(
        "You are a friendly weather forecaster. Based on historical data for {city} on {date}, \
         generate a conversational, easy-to-read summary for a local in {city}.\n\
         Historical Data:\n\
         - Average High Temp: {high}\n\
         - Average Low Temp: {low}\n\
         - Chance of Rain: {rain}\n\
         - Data based on {years} years of records.\n\
         Generate the summary now.",
        city = stats.city,
        date = stats.date_analyzed,
        high = format_celsius(stats.avg_max_temp),
        low = format_celsius(stats.avg_min_temp),
        rain = format_percent(stats.chance_of_rain),
        years = stats.based_on_years_of_data,
    )
}

#[derive(Debug, Clone)]
pub struct SummaryConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn into_text(self) -> Option<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();
        (!text.is_empty()).then_some(text)
    }
}

/// Client for the Generative Language `generateContent` endpoint. One
/// attempt per summary, no retries.
pub struct GeminiSummarizer {
    client: Client,
    config: SummaryConfig,
}

impl GeminiSummarizer {
    pub fn new(config: SummaryConfig) -> Result<Self, SummaryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    pub async fn generate(&self, prompt: &str) -> Result<String, SummaryError> {
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };

        let url = self.endpoint();
        debug!("requesting summary from: {}", url);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SummaryError::Status(response.status()));
        }

        let generated: GenerateResponse = response.json().await?;
        generated.into_text().ok_or(SummaryError::EmptyResponse)
    }
}

#[async_trait]
impl Summarizer for GeminiSummarizer {
    async fn summarize(&self, stats: &HistoricalStatistics) -> String {
        match self.generate(&build_prompt(stats)).await {
            Ok(text) => text,
            Err(e) => {
                warn!("error generating summary for {}: {}", stats.city, e);
                format!("{}{}", SUMMARY_FAILURE_PREFIX, e)
            }
        }
    }
}

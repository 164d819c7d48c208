//! Same-day and same-week statistics across every year in the dataset.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use time::{macros::format_description, Date, Month};
use utoipa::ToSchema;

use super::weather_data::{canonical_city, ClimateEngine, Error, WeatherRecord};

/// A day counts as rainy above this many millimeters of rain
pub const RAIN_THRESHOLD_MM: f64 = 0.1;

/// Most recent years kept in a trend series
pub const TREND_YEARS: usize = 20;

/// Non-leap year used to render day labels
const REFERENCE_YEAR: i32 = 2001;
/// Fallback for February 29, which the non-leap year cannot represent
const LEAP_REFERENCE_YEAR: i32 = 2000;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct HistoricalStatistics {
    pub city: String,
    /// e.g. "August 05"
    pub date_analyzed: String,
    /// Number of matching rows, one per year unless the source repeats days
    pub based_on_years_of_data: usize,
    #[serde(rename = "average_max_temp", serialize_with = "serialize_celsius")]
    #[schema(value_type = String, example = "30.4°C")]
    pub avg_max_temp: Option<f64>,
    #[serde(rename = "average_min_temp", serialize_with = "serialize_celsius")]
    #[schema(value_type = String, example = "24.1°C")]
    pub avg_min_temp: Option<f64>,
    #[serde(rename = "historical_record_high", serialize_with = "serialize_celsius")]
    #[schema(value_type = String, example = "32.0°C")]
    pub record_high: Option<f64>,
    #[serde(rename = "historical_record_low", serialize_with = "serialize_celsius")]
    #[schema(value_type = String, example = "21.8°C")]
    pub record_low: Option<f64>,
    #[serde(serialize_with = "serialize_percent")]
    #[schema(value_type = String, example = "40%")]
    pub chance_of_rain: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TrendPoint {
    pub year: i32,
    /// Mean daily max temperature for the week, `null` when no readings exist
    pub avg_temp: Option<f64>,
}

/// Renders a temperature as "30.4°C", or "N/A" when there were no readings.
pub fn format_celsius(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}°C", v),
        None => String::from("N/A"),
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{:.0}%", value)
}

fn serialize_celsius<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_celsius(*value))
}

fn serialize_percent<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_percent(*value))
}

/// Human readable label for a month/day, e.g. "August 05".
pub fn date_label(month: u8, day: u8) -> Result<String, Error> {
    let month_value = Month::try_from(month).map_err(|_| Error::InvalidDate { month, day })?;
    let reference = Date::from_calendar_date(REFERENCE_YEAR, month_value, day)
        .or_else(|_| Date::from_calendar_date(LEAP_REFERENCE_YEAR, month_value, day))
        .map_err(|_| Error::InvalidDate { month, day })?;
    Ok(reference.format(format_description!("[month repr:long] [day]"))?)
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Halves go to the even neighbour, matching how temperatures are formatted.
fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

impl ClimateEngine {
    /// Statistics for one calendar day across every year on record for `city`.
    pub fn historical_analysis(
        &self,
        city: &str,
        month: u8,
        day: u8,
    ) -> Result<HistoricalStatistics, Error> {
        let records = self.city_records(city)?;
        let matches: Vec<&WeatherRecord> = records
            .iter()
            .filter(|r| u8::from(r.date.month()) == month && r.date.day() == day)
            .collect();
        if matches.is_empty() {
            return Err(Error::NoHistoricalDataForDate(city.to_owned()));
        }

        let total = matches.len();
        let max_temps: Vec<f64> = matches.iter().filter_map(|r| r.temperature_2m_max).collect();
        let min_temps: Vec<f64> = matches.iter().filter_map(|r| r.temperature_2m_min).collect();
        // missing rain_sum counts as a dry day, the denominator stays `total`
        let rainy_days = matches
            .iter()
            .filter(|r| r.rain_sum.is_some_and(|rain| rain > RAIN_THRESHOLD_MM))
            .count();

        Ok(HistoricalStatistics {
            city: canonical_city(city),
            date_analyzed: date_label(month, day)?,
            based_on_years_of_data: total,
            avg_max_temp: mean(max_temps.iter().copied()),
            avg_min_temp: mean(min_temps.iter().copied()),
            record_high: max_temps.iter().copied().reduce(f64::max),
            record_low: min_temps.iter().copied().reduce(f64::min),
            chance_of_rain: rainy_days as f64 / total as f64 * 100.0,
        })
    }

    /// Yearly mean max temperature for the ISO week of `central_date`,
    /// oldest first, limited to the most recent [`TREND_YEARS`] years.
    pub fn chart_data(&self, city: &str, central_date: Date) -> Result<Vec<TrendPoint>, Error> {
        let records = self.city_records(city)?;
        let target_week = central_date.iso_week();

        let mut by_year: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
        for record in records.iter().filter(|r| r.date.iso_week() == target_week) {
            let (sum, count) = by_year.entry(record.date.year()).or_insert((0.0, 0));
            if let Some(max_temp) = record.temperature_2m_max {
                *sum += max_temp;
                *count += 1;
            }
        }
        if by_year.is_empty() {
            return Err(Error::InsufficientHistoricalData);
        }

        let skip = by_year.len().saturating_sub(TREND_YEARS);
        Ok(by_year
            .into_iter()
            .skip(skip)
            .map(|(year, (sum, count))| TrendPoint {
                year,
                avg_temp: (count > 0).then(|| round_tenth(sum / count as f64)),
            })
            .collect())
    }
}

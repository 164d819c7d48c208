use duckdb::{
    arrow::array::{Array, Date32Array, Float64Array, RecordBatch, StringArray},
    Connection,
};
use india_climate_core::{from_epoch_days, path_exists};
use log::{info, warn};
use std::collections::HashMap;
use std::path::Path;
use time::Date;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("City '{0}' not found.")]
    CityNotFound(String),
    #[error("No historical data found for that date in {0}.")]
    NoHistoricalDataForDate(String),
    #[error("Not enough historical data to generate a trend chart.")]
    InsufficientHistoricalData,
    #[error("{month}/{day} is not a calendar day")]
    InvalidDate { month: u8, day: u8 },
    #[error("Dataset file not found: {0}")]
    DatasetMissing(String),
    #[error("Failed to query duckdb: {0}")]
    Query(#[from] duckdb::Error),
    #[error("Unexpected dataset schema: {0}")]
    Schema(String),
    #[error("Failed to format date label: {0}")]
    TimeFormat(#[from] time::error::Format),
}

/// One day of weather for one city.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRecord {
    pub city: String,
    pub date: Date,
    pub temperature_2m_max: Option<f64>,
    pub temperature_2m_min: Option<f64>,
    pub precipitation_sum: Option<f64>,
    pub rain_sum: Option<f64>,
    pub wind_speed_10m_max: Option<f64>,
}

/// Canonical form used to match city names: surrounding whitespace removed,
/// inner whitespace collapsed, and each word title-cased (a letter is
/// upper-cased when it does not follow another letter).
pub fn canonical_city(name: &str) -> String {
    let collapsed = name.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut canonical = String::with_capacity(collapsed.len());
    let mut follows_letter = false;
    for c in collapsed.chars() {
        if c.is_alphabetic() {
            if follows_letter {
                canonical.extend(c.to_lowercase());
            } else {
                canonical.extend(c.to_uppercase());
            }
            follows_letter = true;
        } else {
            canonical.push(c);
            follows_letter = false;
        }
    }
    canonical
}

/// Immutable in-memory dataset, partitioned by canonical city.
pub struct ClimateEngine {
    cities: HashMap<String, Vec<WeatherRecord>>,
    record_count: usize,
}

impl ClimateEngine {
    /// Builds the engine from records already in memory. City names are
    /// canonicalized; row order within a city is preserved.
    pub fn new(records: Vec<WeatherRecord>) -> Self {
        let record_count = records.len();
        let mut cities: HashMap<String, Vec<WeatherRecord>> = HashMap::new();
        for mut record in records {
            record.city = canonical_city(&record.city);
            cities.entry(record.city.clone()).or_default().push(record);
        }
        Self {
            cities,
            record_count,
        }
    }

    /// Loads the full snapshot into memory. `date` is cast to DATE so
    /// snapshots that carry it as text load too.
    pub fn load(path: &Path) -> Result<Self, Error> {
        if !path_exists(path) {
            return Err(Error::DatasetMissing(path.display().to_string()));
        }

        let query = format!(
            r#"
            SELECT
                CAST(city AS VARCHAR) AS city,
                CAST(date AS DATE) AS date,
                CAST(temperature_2m_max AS DOUBLE) AS temperature_2m_max,
                CAST(temperature_2m_min AS DOUBLE) AS temperature_2m_min,
                CAST(precipitation_sum AS DOUBLE) AS precipitation_sum,
                CAST(rain_sum AS DOUBLE) AS rain_sum,
                CAST(wind_speed_10m_max AS DOUBLE) AS wind_speed_10m_max
            FROM read_parquet('{}')
            "#,
            path.display().to_string().replace('\'', "''")
        );

        let conn = open_connection()?;
        let mut stmt = conn.prepare(&query)?;
        let batches: Vec<RecordBatch> = stmt.query_arrow([])?.collect();

        let mut records = Vec::new();
        let mut skipped = 0;
        for batch in &batches {
            skipped += read_batch(batch, &mut records)?;
        }
        if skipped > 0 {
            warn!("skipped {} rows without a city or date", skipped);
        }

        let engine = Self::new(records);
        info!(
            "loaded {} weather records for {} cities from {}",
            engine.len(),
            engine.cities.len(),
            path.display()
        );
        Ok(engine)
    }

    pub fn len(&self) -> usize {
        self.record_count
    }

    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }

    /// Canonical city names, sorted.
    pub fn cities(&self) -> Vec<String> {
        let mut names: Vec<String> = self.cities.keys().cloned().collect();
        names.sort();
        names
    }

    pub(crate) fn city_records(&self, city: &str) -> Result<&[WeatherRecord], Error> {
        self.cities
            .get(&canonical_city(city))
            .map(Vec::as_slice)
            .filter(|records| !records.is_empty())
            .ok_or_else(|| Error::CityNotFound(city.to_owned()))
    }
}

/// Creates new in-memory connection, the snapshot is only read once at startup
fn open_connection() -> Result<Connection, duckdb::Error> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("INSTALL parquet; LOAD parquet;")?;
    Ok(conn)
}

fn column<'a, T: 'static>(batch: &'a RecordBatch, index: usize) -> Result<&'a T, Error> {
    batch
        .column(index)
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| {
            Error::Schema(format!(
                "column {} has type {}",
                batch.schema().field(index).name(),
                batch.column(index).data_type()
            ))
        })
}

// NaN is how some writers encode a missing reading
fn reading(values: &Float64Array, row: usize) -> Option<f64> {
    if values.is_null(row) {
        None
    } else {
        Some(values.value(row)).filter(|v| !v.is_nan())
    }
}

/// Appends the rows of `batch` to `records`, returning how many were skipped.
fn read_batch(batch: &RecordBatch, records: &mut Vec<WeatherRecord>) -> Result<usize, Error> {
    let city_arr = column::<StringArray>(batch, 0)?;
    let date_arr = column::<Date32Array>(batch, 1)?;
    let max_temp_arr = column::<Float64Array>(batch, 2)?;
    let min_temp_arr = column::<Float64Array>(batch, 3)?;
    let precipitation_arr = column::<Float64Array>(batch, 4)?;
    let rain_arr = column::<Float64Array>(batch, 5)?;
    let wind_speed_arr = column::<Float64Array>(batch, 6)?;

    let mut skipped = 0;
    for row in 0..batch.num_rows() {
        if city_arr.is_null(row) || date_arr.is_null(row) {
            skipped += 1;
            continue;
        }
        let date = from_epoch_days(date_arr.value(row))
            .map_err(|e| Error::Schema(e.to_string()))?;

        records.push(WeatherRecord {
            city: city_arr.value(row).to_owned(),
            date,
            temperature_2m_max: reading(max_temp_arr, row),
            temperature_2m_min: reading(min_temp_arr, row),
            precipitation_sum: reading(precipitation_arr, row),
            rain_sum: reading(rain_arr, row),
            wind_speed_10m_max: reading(wind_speed_arr, row),
        });
    }
    Ok(skipped)
}

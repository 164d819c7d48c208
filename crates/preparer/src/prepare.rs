use anyhow::{anyhow, bail, Error};
use india_climate_core::{
    create_dir_all, parse_date, path_exists, to_epoch_days, SNAPSHOT_COLUMNS,
};
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::record::RecordWriter;
use serde::Deserialize;
use slog::{debug, info, warn, Logger};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use crate::{create_snapshot_schema, SnapshotRow};

/// Row of the raw extract. Extra columns in the CSV are ignored and cells
/// that do not parse as numbers become missing values.
#[derive(Debug, Deserialize)]
struct RawRow {
    city: String,
    date: String,
    #[serde(deserialize_with = "csv::invalid_option")]
    temperature_2m_max: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    temperature_2m_min: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    precipitation_sum: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    rain_sum: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    wind_speed_10m_max: Option<f64>,
}

fn reading(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}

impl TryFrom<RawRow> for SnapshotRow {
    type Error = anyhow::Error;
    fn try_from(val: RawRow) -> Result<Self, Self::Error> {
        let date = parse_date(&val.date)?;
        Ok(SnapshotRow {
            city: val.city,
            date: to_epoch_days(date),
            temperature_2m_max: reading(val.temperature_2m_max),
            temperature_2m_min: reading(val.temperature_2m_min),
            precipitation_sum: reading(val.precipitation_sum),
            rain_sum: reading(val.rain_sum),
            wind_speed_10m_max: reading(val.wind_speed_10m_max),
        })
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct PrepareReport {
    pub rows_read: usize,
    pub rows_written: usize,
    pub rows_skipped: usize,
}

struct SnapshotWriter {
    writer: SerializedFileWriter<File>,
}

impl SnapshotWriter {
    fn create(output: &Path) -> Result<Self, Error> {
        let file = File::create(output)
            .map_err(|e| anyhow!("failed to create parquet file: {}", e))?;
        let props = WriterProperties::builder().build();
        let writer = SerializedFileWriter::new(
            file,
            Arc::new(create_snapshot_schema()?),
            Arc::new(props),
        )
        .map_err(|e| anyhow!("failed to create parquet writer: {}", e))?;
        Ok(Self { writer })
    }

    fn write_batch(&mut self, rows: &[SnapshotRow]) -> Result<(), Error> {
        let mut row_group = self
            .writer
            .next_row_group()
            .map_err(|e| anyhow!("failed to create row group: {}", e))?;
        rows.write_to_row_group(&mut row_group)
            .map_err(|e| anyhow!("failed to write rows: {}", e))?;
        row_group
            .close()
            .map_err(|e| anyhow!("failed to close row group: {}", e))?;
        Ok(())
    }

    fn close(self) -> Result<(), Error> {
        self.writer
            .close()
            .map_err(|e| anyhow!("failed to close parquet writer: {}", e))?;
        Ok(())
    }
}

fn check_headers(headers: &csv::StringRecord) -> Result<(), Error> {
    let missing: Vec<&str> = SNAPSHOT_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|header| header.trim() == *column))
        .collect();
    if !missing.is_empty() {
        bail!("input is missing required columns: {}", missing.join(", "));
    }
    Ok(())
}

/// Reads the raw extract at `input` and writes the snapshot to `output`,
/// keeping only the snapshot columns and preserving row order.
pub fn prepare_dataset(
    logger: &Logger,
    input: &Path,
    output: &Path,
    batch_size: usize,
) -> Result<PrepareReport, Error> {
    if !path_exists(input) {
        bail!("input file was not found at {}", input.display());
    }

    info!(logger, "loading raw extract from {}", input.display());
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_path(input)
        .map_err(|e| anyhow!("failed to open input: {}", e))?;
    check_headers(reader.headers()?)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent)?;
    }
    let mut writer = SnapshotWriter::create(output)?;

    let batch_size = batch_size.max(1);
    let mut report = PrepareReport::default();
    let mut batch = Vec::with_capacity(batch_size);
    for (line, result) in reader.deserialize::<RawRow>().enumerate() {
        report.rows_read += 1;
        let row = match result.map_err(Error::from).and_then(SnapshotRow::try_from) {
            Ok(row) => row,
            Err(e) => {
                // header is line 1
                warn!(logger, "skipping row {}: {}", line + 2, e);
                report.rows_skipped += 1;
                continue;
            }
        };
        batch.push(row);

        if batch.len() == batch_size {
            debug!(logger, "writing row group of {} rows", batch.len());
            writer.write_batch(&batch)?;
            report.rows_written += batch.len();
            batch.clear();
        }
    }

    if !batch.is_empty() {
        debug!(logger, "writing final row group of {} rows", batch.len());
        writer.write_batch(&batch)?;
        report.rows_written += batch.len();
    }
    writer.close()?;

    info!(
        logger,
        "wrote {} of {} rows to {} ({} skipped)",
        report.rows_written,
        report.rows_read,
        output.display(),
        report.rows_skipped
    );
    Ok(report)
}

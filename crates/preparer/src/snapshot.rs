use parquet::{
    basic::{LogicalType, Repetition, Type as PhysicalType},
    errors::Result,
    schema::types::Type,
};
use parquet_derive::ParquetRecordWriter;
use std::sync::Arc;

/// One row of the snapshot. `date` is days since 1970-01-01 and is written
/// to a DATE column.
#[derive(Debug, Clone, PartialEq, ParquetRecordWriter)]
pub struct SnapshotRow {
    pub city: String,
    pub date: i32,
    pub temperature_2m_max: Option<f64>,
    pub temperature_2m_min: Option<f64>,
    pub precipitation_sum: Option<f64>,
    pub rain_sum: Option<f64>,
    pub wind_speed_10m_max: Option<f64>,
}

fn measurement(name: &str) -> Result<Arc<Type>> {
    Ok(Arc::new(
        Type::primitive_type_builder(name, PhysicalType::DOUBLE)
            .with_repetition(Repetition::OPTIONAL)
            .build()?,
    ))
}

pub fn create_snapshot_schema() -> Result<Type> {
    let city = Type::primitive_type_builder("city", PhysicalType::BYTE_ARRAY)
        .with_repetition(Repetition::REQUIRED)
        .with_logical_type(Some(LogicalType::String))
        .build()?;

    let date = Type::primitive_type_builder("date", PhysicalType::INT32)
        .with_repetition(Repetition::REQUIRED)
        .with_logical_type(Some(LogicalType::Date))
        .build()?;

    Type::group_type_builder("india_weather")
        .with_fields(vec![
            Arc::new(city),
            Arc::new(date),
            measurement("temperature_2m_max")?,
            measurement("temperature_2m_min")?,
            measurement("precipitation_sum")?,
            measurement("rain_sum")?,
            measurement("wind_speed_10m_max")?,
        ])
        .build()
}

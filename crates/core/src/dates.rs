//! Calendar date helpers shared by the snapshot writer and reader.
//!
//! The snapshot stores `date` as a Parquet DATE, which is an INT32 count of
//! days since 1970-01-01.

use time::{
    macros::{date, format_description},
    Date,
};

const UNIX_EPOCH_JULIAN_DAY: i32 = date!(1970 - 01 - 01).to_julian_day();

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum DateError {
    #[error("'{0}' is not an ISO 8601 date")]
    Unrecognized(String),
    #[error("{0} days from the epoch is out of range")]
    OutOfRange(i32),
}

/// Parse `YYYY-MM-DD`, optionally followed by a time part separated by
/// `T` or a space. Only the date portion is kept.
pub fn parse_date(value: &str) -> Result<Date, DateError> {
    let date_part = value.trim().split(['T', ' ']).next().unwrap_or_default();
    Date::parse(date_part, format_description!("[year]-[month]-[day]"))
        .map_err(|_| DateError::Unrecognized(value.to_owned()))
}

pub fn to_epoch_days(date: Date) -> i32 {
    date.to_julian_day() - UNIX_EPOCH_JULIAN_DAY
}

pub fn from_epoch_days(days: i32) -> Result<Date, DateError> {
    days.checked_add(UNIX_EPOCH_JULIAN_DAY)
        .and_then(|julian| Date::from_julian_day(julian).ok())
        .ok_or(DateError::OutOfRange(days))
}

//! Display field derivation for earthquake records
//!
//! Everything here is pure: the same record and settings always produce the same
//! fields, with one documented exception. [`format_date`] and [`format_time`] render
//! in the runtime's local time zone, so the same `time_millis` can produce different
//! wall-clock text on machines configured for different zones. Use
//! [`format_date_in`]/[`format_time_in`] to pin a zone.

use crate::config::DisplayConfig;
use crate::types::EarthquakeRecord;
use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

/// Separator between the offset and the primary place name, e.g. "5km W of Test City"
pub const LOCATION_SEPARATOR: &str = " of ";

const DATE_PATTERN: &str = "%b %-d, %Y";
const TIME_PATTERN: &str = "%-I:%M %p";

/// Color band for a magnitude
///
/// Magnitudes are floored; everything below 2 shares the first band and everything
/// from 10 up shares the last.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MagnitudeBucket {
    /// Below 2.0
    One,
    /// [2.0, 3.0)
    Two,
    /// [3.0, 4.0)
    Three,
    /// [4.0, 5.0)
    Four,
    /// [5.0, 6.0)
    Five,
    /// [6.0, 7.0)
    Six,
    /// [7.0, 8.0)
    Seven,
    /// [8.0, 9.0)
    Eight,
    /// [9.0, 10.0)
    Nine,
    /// 10.0 and above
    TenPlus,
}

impl MagnitudeBucket {
    /// All buckets, lowest first
    pub const ALL: [MagnitudeBucket; 10] = [
        MagnitudeBucket::One,
        MagnitudeBucket::Two,
        MagnitudeBucket::Three,
        MagnitudeBucket::Four,
        MagnitudeBucket::Five,
        MagnitudeBucket::Six,
        MagnitudeBucket::Seven,
        MagnitudeBucket::Eight,
        MagnitudeBucket::Nine,
        MagnitudeBucket::TenPlus,
    ];

    /// Lookup key for color tables: "1" through "9", then "10+"
    pub fn label(self) -> &'static str {
        match self {
            MagnitudeBucket::One => "1",
            MagnitudeBucket::Two => "2",
            MagnitudeBucket::Three => "3",
            MagnitudeBucket::Four => "4",
            MagnitudeBucket::Five => "5",
            MagnitudeBucket::Six => "6",
            MagnitudeBucket::Seven => "7",
            MagnitudeBucket::Eight => "8",
            MagnitudeBucket::Nine => "9",
            MagnitudeBucket::TenPlus => "10+",
        }
    }

    /// Numeric band, 1 through 10
    pub fn level(self) -> u8 {
        match self {
            MagnitudeBucket::One => 1,
            MagnitudeBucket::Two => 2,
            MagnitudeBucket::Three => 3,
            MagnitudeBucket::Four => 4,
            MagnitudeBucket::Five => 5,
            MagnitudeBucket::Six => 6,
            MagnitudeBucket::Seven => 7,
            MagnitudeBucket::Eight => 8,
            MagnitudeBucket::Nine => 9,
            MagnitudeBucket::TenPlus => 10,
        }
    }
}

impl std::fmt::Display for MagnitudeBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Consumer-supplied colors keyed by bucket label
///
/// Serialized as a plain map, e.g. `{"1": "#4A7BA7", "10+": "#C03823"}`. Buckets
/// without an entry have no color.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MagnitudePalette {
    colors: BTreeMap<String, String>,
}

impl MagnitudePalette {
    /// Set the color for a bucket
    pub fn with_color(mut self, bucket: MagnitudeBucket, color: impl Into<String>) -> Self {
        self.colors.insert(bucket.label().to_string(), color.into());
        self
    }

    /// Color for a bucket, if the consumer supplied one
    pub fn color_for(&self, bucket: MagnitudeBucket) -> Option<&str> {
        self.colors.get(bucket.label()).map(String::as_str)
    }

    /// Whether no colors are configured
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Location text split for two-line display
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocationParts {
    /// Distance/direction part including the separator, e.g. "5km W of "
    pub offset: String,
    /// Place name, e.g. "Test City"
    pub primary: String,
}

/// All derived fields for one list row
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayFields {
    /// Magnitude with one decimal, e.g. "4.2"
    pub magnitude: String,
    /// Color band
    pub bucket: MagnitudeBucket,
    /// Palette color for the band, if configured
    pub color: Option<String>,
    /// Offset line
    pub location_offset: String,
    /// Primary place line
    pub primary_location: String,
    /// Local date, e.g. "Mar 3, 1984"
    pub date: String,
    /// Local time, e.g. "4:30 PM"
    pub time: String,
}

/// Render a magnitude with exactly one fractional digit
///
/// Rounds the exact binary value with ties to even, so `2.95` (stored slightly
/// above 2.95) renders as "3.0".
pub fn format_magnitude(magnitude: f64) -> String {
    format!("{:.1}", magnitude)
}

/// Classify a magnitude into its color band
pub fn magnitude_bucket(magnitude: f64) -> MagnitudeBucket {
    let floor = magnitude.floor();
    if floor >= 10.0 {
        return MagnitudeBucket::TenPlus;
    }
    // NaN falls through to the lowest band
    match floor as i64 {
        2 => MagnitudeBucket::Two,
        3 => MagnitudeBucket::Three,
        4 => MagnitudeBucket::Four,
        5 => MagnitudeBucket::Five,
        6 => MagnitudeBucket::Six,
        7 => MagnitudeBucket::Seven,
        8 => MagnitudeBucket::Eight,
        9 => MagnitudeBucket::Nine,
        _ => MagnitudeBucket::One,
    }
}

/// Split a location at the first " of "
///
/// Without a separator the offset is `near_the` and the primary part is the whole
/// location. Later separators stay in the primary part.
pub fn split_location(location: &str, near_the: &str) -> LocationParts {
    match location.split_once(LOCATION_SEPARATOR) {
        Some((offset, primary)) => LocationParts {
            offset: format!("{offset}{LOCATION_SEPARATOR}"),
            primary: primary.to_string(),
        },
        None => LocationParts {
            offset: near_the.to_string(),
            primary: location.to_string(),
        },
    }
}

/// Local date text, e.g. "Mar 3, 1984"
pub fn format_date(time_millis: i64) -> String {
    format_date_in(time_millis, &Local)
}

/// Local 12-hour time text, e.g. "4:30 PM"
pub fn format_time(time_millis: i64) -> String {
    format_time_in(time_millis, &Local)
}

/// Date text in an explicit time zone
///
/// Returns an empty string when `time_millis` is outside chrono's range.
pub fn format_date_in<Tz>(time_millis: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    render(time_millis, tz, DATE_PATTERN)
}

/// 12-hour time text in an explicit time zone
///
/// Returns an empty string when `time_millis` is outside chrono's range.
pub fn format_time_in<Tz>(time_millis: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    render(time_millis, tz, TIME_PATTERN)
}

fn render<Tz>(time_millis: i64, tz: &Tz, pattern: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match DateTime::<Utc>::from_timestamp_millis(time_millis) {
        Some(utc) => utc.with_timezone(tz).format(pattern).to_string(),
        None => {
            tracing::debug!(time_millis, "timestamp out of range, rendering empty text");
            String::new()
        }
    }
}

/// Derive every display field of a record using the local time zone
pub fn display_fields(record: &EarthquakeRecord, display: &DisplayConfig) -> DisplayFields {
    display_fields_in(record, display, &Local)
}

/// Derive every display field of a record in an explicit time zone
pub fn display_fields_in<Tz>(
    record: &EarthquakeRecord,
    display: &DisplayConfig,
    tz: &Tz,
) -> DisplayFields
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let bucket = magnitude_bucket(record.magnitude);
    let LocationParts { offset, primary } = split_location(&record.location, &display.near_the);

    DisplayFields {
        magnitude: format_magnitude(record.magnitude),
        bucket,
        color: display.palette.color_for(bucket).map(str::to_string),
        location_offset: offset,
        primary_location: primary,
        date: format_date_in(record.time_millis, tz),
        time: format_time_in(record.time_millis, tz),
    }
}

//! GeoJSON feed decoding
//!
//! Turns a USGS-style `FeatureCollection` into [`EarthquakeRecord`]s. Each feature is
//! decoded on its own; a feature without a numeric magnitude or time is dropped and
//! the rest of the batch survives. Only a payload that is not a feature collection
//! at all is an error.

use crate::error::DecodeError;
use crate::types::EarthquakeRecord;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Top-level payload shape; features stay untyped so each can fail independently
#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<Value>,
}

/// Decode a feed payload into records, preserving feed order
///
/// # Errors
/// Returns `DecodeError::MalformedPayload` if the bytes are not JSON or the document
/// has no `features` array
pub fn decode(bytes: &[u8]) -> Result<Vec<EarthquakeRecord>, DecodeError> {
    let collection: FeatureCollection = serde_json::from_slice(bytes)
        .map_err(|e| DecodeError::MalformedPayload(e.to_string()))?;

    let total = collection.features.len();
    let records: Vec<EarthquakeRecord> = collection
        .features
        .iter()
        .enumerate()
        .filter_map(|(index, feature)| {
            let record = decode_feature(feature);
            if record.is_none() {
                debug!(index, "Dropping malformed feed entry");
            }
            record
        })
        .collect();

    if records.len() < total {
        debug!(
            total,
            kept = records.len(),
            dropped = total - records.len(),
            "Dropped malformed feed entries"
        );
    }

    Ok(records)
}

/// Decode a single feature, or `None` if it cannot form a complete record
///
/// `properties.mag` and `properties.time` are required and must be numeric. A
/// negative or non-finite magnitude is rejected. `place` and `url` default to empty
/// strings when absent or not strings.
pub fn decode_feature(feature: &Value) -> Option<EarthquakeRecord> {
    let properties = feature.get("properties")?.as_object()?;

    let magnitude = properties.get("mag")?.as_f64()?;
    if !magnitude.is_finite() || magnitude < 0.0 {
        debug!(magnitude, "Skipping entry with out-of-range magnitude");
        return None;
    }

    let time_millis = properties.get("time").and_then(millis_from_json)?;

    let text = |key: &str| {
        properties
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    Some(EarthquakeRecord {
        magnitude,
        location: text("place"),
        time_millis,
        detail_url: text("url"),
    })
}

/// Integer milliseconds, also accepting integral floats such as `1.7e12`
fn millis_from_json(value: &Value) -> Option<i64> {
    if let Some(millis) = value.as_i64() {
        return Some(millis);
    }
    let float = value.as_f64()?;
    let in_range = float.is_finite()
        && float.fract() == 0.0
        && float >= i64::MIN as f64
        && float < i64::MAX as f64;
    in_range.then_some(float as i64)
}

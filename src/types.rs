//! Core types for quake-feed

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LoadFailure;

/// A decoded seismic event
///
/// Records are only ever constructed fully populated; the decoder skips entries
/// missing a magnitude or time instead of producing partial records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EarthquakeRecord {
    /// Magnitude (non-negative)
    pub magnitude: f64,
    /// Free-text place description, e.g. "5km W of Test City"
    pub location: String,
    /// Event time in epoch milliseconds, UTC
    pub time_millis: i64,
    /// "More info" page for the event (may be empty)
    pub detail_url: String,
}

impl EarthquakeRecord {
    /// Create a new record
    pub fn new(
        magnitude: f64,
        location: impl Into<String>,
        time_millis: i64,
        detail_url: impl Into<String>,
    ) -> Self {
        Self {
            magnitude,
            location: location.into(),
            time_millis,
            detail_url: detail_url.into(),
        }
    }

    /// Event time as a UTC timestamp
    ///
    /// Returns `None` when `time_millis` is outside chrono's representable range.
    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.time_millis).single()
    }

    /// Parsed detail page URI for opening in a browser
    ///
    /// Returns `None` for an empty or unparsable `detail_url`.
    pub fn detail_uri(&self) -> Option<url::Url> {
        if self.detail_url.is_empty() {
            return None;
        }
        url::Url::parse(&self.detail_url).ok()
    }
}

/// Outcome of one load cycle
#[derive(Clone, Debug, PartialEq)]
pub enum FeedResult {
    /// Records in feed order (may be empty)
    Success(Vec<EarthquakeRecord>),
    /// The cycle failed; consumers show a generic empty/error state
    Failure(LoadFailure),
}

impl FeedResult {
    /// Whether this is a `Success`
    pub fn is_success(&self) -> bool {
        matches!(self, FeedResult::Success(_))
    }

    /// Records of a successful load, or an empty slice on failure
    pub fn records(&self) -> &[EarthquakeRecord] {
        match self {
            FeedResult::Success(records) => records,
            FeedResult::Failure(_) => &[],
        }
    }

    /// Failure reason, if any
    pub fn failure(&self) -> Option<&LoadFailure> {
        match self {
            FeedResult::Success(_) => None,
            FeedResult::Failure(reason) => Some(reason),
        }
    }
}

impl From<std::result::Result<Vec<EarthquakeRecord>, LoadFailure>> for FeedResult {
    fn from(result: std::result::Result<Vec<EarthquakeRecord>, LoadFailure>) -> Self {
        match result {
            Ok(records) => FeedResult::Success(records),
            Err(reason) => FeedResult::Failure(reason),
        }
    }
}

/// Load controller state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    /// No load requested, or the controller was reset
    Idle,
    /// A session is in flight
    Loading,
    /// The last session's result has been delivered
    Delivered,
    /// The last request found no connectivity
    NoConnectivity,
}

impl std::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LoadState::Idle => "idle",
            LoadState::Loading => "loading",
            LoadState::Delivered => "delivered",
            LoadState::NoConnectivity => "no_connectivity",
        };
        f.write_str(name)
    }
}

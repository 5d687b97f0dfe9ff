//! # quake-feed
//!
//! Loads recent earthquakes from a USGS GeoJSON feed and derives the text a list
//! row needs to show them.
//!
//! ## Design Philosophy
//!
//! quake-feed is designed to be:
//! - **Lifecycle-safe** - A consumer can come and go; a cancelled load never reaches it
//! - **Tolerant** - One malformed feed entry is dropped, the rest of the feed survives
//! - **Library-first** - Rendering, navigation and platform connectivity are left to the caller
//! - **Pure where possible** - Display formatting is free functions over plain records
//!
//! ## Quick Start
//!
//! ```no_run
//! use quake_feed::{Config, ConnectivityFlag, FeedConsumer, FeedResult, LoadController};
//! use quake_feed::format::display_fields;
//! use std::sync::Arc;
//!
//! struct Screen {
//!     rows: Vec<String>,
//!     config: Config,
//! }
//!
//! impl FeedConsumer for Screen {
//!     fn on_result(&mut self, result: &FeedResult) {
//!         self.rows = result
//!             .records()
//!             .iter()
//!             .map(|record| {
//!                 let fields = display_fields(record, &self.config.display);
//!                 format!("{} {}{}", fields.magnitude, fields.location_offset, fields.primary_location)
//!             })
//!             .collect();
//!     }
//!
//!     fn on_cleared(&mut self) {
//!         self.rows.clear();
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let screen = Screen { rows: vec![], config: config.clone() };
//!     let network = ConnectivityFlag::new(true);
//!
//!     let mut controller = LoadController::from_config(&config.feed, Arc::new(network), screen)?;
//!     controller.request_load();
//!     controller.await_delivery().await;
//!
//!     for row in &controller.consumer().rows {
//!         println!("{row}");
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Load coordination and consumer/connectivity contracts
pub mod controller;
/// GeoJSON feed decoding
pub mod decoder;
/// Error types
pub mod error;
/// Feed retrieval
pub mod fetcher;
/// Display field derivation
pub mod format;
/// Cancellable load sessions
pub mod loader;
/// Core types
pub mod types;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used types
pub use config::{Config, DisplayConfig, FeedConfig};
pub use controller::{ConnectivityFlag, ConnectivityProbe, FeedConsumer, LoadController};
pub use error::{ConnectivityError, DecodeError, Error, FetchError, LoadFailure, Result};
pub use fetcher::{FeedFetcher, HttpFeedFetcher};
pub use format::{DisplayFields, LocationParts, MagnitudeBucket, MagnitudePalette};
pub use loader::{FeedLoader, LoadSession};
pub use types::{EarthquakeRecord, FeedResult, LoadState};

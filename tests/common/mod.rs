//! Common test utilities for quake-feed integration tests

#[allow(dead_code)]
pub mod fixtures;

#[allow(unused_imports)]
pub use fixtures::*;

use quake_feed::{FeedConsumer, FeedResult};

/// Consumer that records every notification
#[derive(Debug, Default)]
pub struct RecordingConsumer {
    /// Results in delivery order
    pub results: Vec<FeedResult>,
    /// Number of `on_cleared` calls
    pub cleared: usize,
}

impl FeedConsumer for RecordingConsumer {
    fn on_result(&mut self, result: &FeedResult) {
        self.results.push(result.clone());
    }

    fn on_cleared(&mut self) {
        self.cleared += 1;
    }
}

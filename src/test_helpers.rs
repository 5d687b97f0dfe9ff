//! Shared test doubles for the fetch/load pipeline.

use crate::controller::FeedConsumer;
use crate::error::FetchError;
use crate::fetcher::FeedFetcher;
use crate::types::FeedResult;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

/// Two well-formed entries and one without a magnitude
pub(crate) fn sample_payload() -> Vec<u8> {
    br#"{
        "type": "FeatureCollection",
        "metadata": { "generated": 1700000000000, "count": 3 },
        "features": [
            {
                "type": "Feature",
                "properties": {
                    "mag": 6.1,
                    "place": "88km SSE of Lata, Solomon Islands",
                    "time": 1699999000000,
                    "url": "https://earthquake.usgs.gov/earthquakes/eventpage/us1"
                }
            },
            {
                "type": "Feature",
                "properties": { "place": "broken entry", "time": 1699998000000 }
            },
            {
                "type": "Feature",
                "properties": {
                    "mag": 5.0,
                    "place": "Fiji region",
                    "time": 1699997000000,
                    "url": "https://earthquake.usgs.gov/earthquakes/eventpage/us2"
                }
            }
        ]
    }"#
    .to_vec()
}

/// Answers every fetch immediately with a fixed response
pub(crate) struct StaticFetcher {
    response: Result<Vec<u8>, FetchError>,
    calls: AtomicUsize,
}

impl StaticFetcher {
    pub(crate) fn ok(body: Vec<u8>) -> Self {
        Self {
            response: Ok(body),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing(error: FetchError) -> Self {
        Self {
            response: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedFetcher for StaticFetcher {
    async fn fetch(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }
}

/// Holds every fetch until the test releases it
pub(crate) struct GatedFetcher {
    body: Vec<u8>,
    calls: AtomicUsize,
    completed: AtomicUsize,
    started: Notify,
    release: Notify,
}

impl GatedFetcher {
    pub(crate) fn new(body: Vec<u8>) -> Self {
        Self {
            body,
            calls: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            started: Notify::new(),
            release: Notify::new(),
        }
    }

    /// Wait until a fetch has begun
    pub(crate) async fn wait_started(&self) {
        self.started.notified().await;
    }

    /// Let one pending (or the next) fetch return
    pub(crate) fn release_one(&self) {
        self.release.notify_one();
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Fetches that ran to completion (not dropped by cancellation)
    pub(crate) fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedFetcher for GatedFetcher {
    async fn fetch(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.started.notify_one();
        self.release.notified().await;
        self.completed.fetch_add(1, Ordering::SeqCst);
        Ok(self.body.clone())
    }
}

/// Records every notification it receives
#[derive(Debug, Default)]
pub(crate) struct RecordingConsumer {
    pub(crate) results: Vec<FeedResult>,
    pub(crate) cleared: usize,
}

impl FeedConsumer for RecordingConsumer {
    fn on_result(&mut self, result: &FeedResult) {
        self.results.push(result.clone());
    }

    fn on_cleared(&mut self) {
        self.cleared += 1;
    }
}

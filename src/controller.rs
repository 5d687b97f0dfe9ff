//! Lifecycle-aware load coordination
//!
//! [`LoadController`] sits between a foreground consumer (a screen that can be
//! shown, hidden and torn down) and the background [`FeedLoader`]. It owns the
//! single active [`LoadSession`], checks connectivity before any network call, and
//! invokes the consumer only from its own methods, so the consumer always runs on
//! the task that drives the controller.
//!
//! # Example
//!
//! ```no_run
//! use quake_feed::config::Config;
//! use quake_feed::{FeedConsumer, FeedResult, LoadController};
//! use std::sync::Arc;
//!
//! struct Printer;
//!
//! impl FeedConsumer for Printer {
//!     fn on_result(&mut self, result: &FeedResult) {
//!         println!("{} records", result.records().len());
//!     }
//!
//!     fn on_cleared(&mut self) {}
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let mut controller = LoadController::from_config(&config.feed, Arc::new(|| true), Printer)?;
//!
//! controller.request_load();
//! controller.await_delivery().await;
//!
//! // Screen torn down
//! controller.reset();
//! # Ok(())
//! # }
//! ```

use crate::config::FeedConfig;
use crate::error::{ConnectivityError, FetchError, LoadFailure, Result};
use crate::fetcher::{FeedFetcher, HttpFeedFetcher};
use crate::loader::{FeedLoader, LoadSession};
use crate::types::{FeedResult, LoadState};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Receives load outcomes
///
/// Each delivered result replaces the consumer's whole display set.
pub trait FeedConsumer {
    /// A load cycle finished, or connectivity was missing
    fn on_result(&mut self, result: &FeedResult);

    /// Previously delivered data is no longer valid
    fn on_cleared(&mut self);
}

/// Synchronous "is the network up" check, queried once per load request
pub trait ConnectivityProbe: Send + Sync {
    /// Whether a network connection is currently available
    fn is_connected(&self) -> bool;
}

impl<F> ConnectivityProbe for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn is_connected(&self) -> bool {
        self()
    }
}

/// Shared connectivity switch, flipped by whatever watches the platform network
#[derive(Clone, Debug)]
pub struct ConnectivityFlag {
    connected: Arc<AtomicBool>,
}

impl ConnectivityFlag {
    /// Create a flag with an initial state
    pub fn new(connected: bool) -> Self {
        Self {
            connected: Arc::new(AtomicBool::new(connected)),
        }
    }

    /// Update the connectivity state
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }
}

impl ConnectivityProbe for ConnectivityFlag {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

/// Coordinates load requests, cancellation and delivery for one consumer
///
/// State machine:
/// - `Idle`/`NoConnectivity` + request → `Loading`, or `NoConnectivity` when the
///   probe reports no network (the consumer gets a connectivity failure at once)
/// - `Loading` + result → `Delivered`
/// - `Delivered` + request → re-delivers the retained result if the last load
///   succeeded, otherwise starts a new load
/// - any + [`reset`](Self::reset) → `Idle`
pub struct LoadController<C: FeedConsumer> {
    url: String,
    loader: FeedLoader,
    probe: Arc<dyn ConnectivityProbe>,
    consumer: C,
    state: LoadState,
    active: Option<LoadSession>,
    retained: Option<FeedResult>,
}

impl<C: FeedConsumer> LoadController<C> {
    /// Create a controller that loads `url` through `fetcher`
    pub fn new(
        url: impl Into<String>,
        fetcher: Arc<dyn FeedFetcher>,
        probe: Arc<dyn ConnectivityProbe>,
        consumer: C,
    ) -> Self {
        Self {
            url: url.into(),
            loader: FeedLoader::new(fetcher),
            probe,
            consumer,
            state: LoadState::Idle,
            active: None,
            retained: None,
        }
    }

    /// Create a controller backed by an [`HttpFeedFetcher`] for `config.url`
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn from_config(
        config: &FeedConfig,
        probe: Arc<dyn ConnectivityProbe>,
        consumer: C,
    ) -> Result<Self> {
        let fetcher = HttpFeedFetcher::new(config)?;
        Ok(Self::new(config.url.clone(), Arc::new(fetcher), probe, consumer))
    }

    /// Ask for data
    ///
    /// Never starts a second session while one is in flight. Must be called from
    /// within a tokio runtime.
    pub fn request_load(&mut self) -> LoadState {
        match self.state {
            LoadState::Loading => {
                debug!(url = %self.url, "Load already in flight, ignoring request");
            }
            LoadState::Delivered if self.retained.is_some() => {
                if let Some(result) = &self.retained {
                    debug!(url = %self.url, "Re-delivering retained feed result");
                    self.consumer.on_result(result);
                }
            }
            _ => self.begin_load(),
        }
        self.state
    }

    /// Discard any in-flight session and retained data, then load again
    pub fn restart_load(&mut self) -> LoadState {
        self.cancel_active();
        self.retained = None;
        self.set_state(LoadState::Idle);
        self.begin_load();
        self.state
    }

    /// Tear down: cancel the active session, drop retained data, notify the consumer
    pub fn reset(&mut self) {
        self.cancel_active();
        self.retained = None;
        self.set_state(LoadState::Idle);
        self.consumer.on_cleared();
    }

    /// Wait for the active session and deliver its result
    ///
    /// Returns `false` immediately when nothing is in flight. Cancel-safe: if the
    /// returned future is dropped, the session stays active.
    pub async fn await_delivery(&mut self) -> bool {
        let Some(session) = self.active.as_mut() else {
            return false;
        };

        let outcome = session.wait().await;
        match outcome {
            Some(result) => {
                self.deliver(result);
                true
            }
            None => self.deliver_lost_session(),
        }
    }

    /// Deliver the active session's result if it is already available
    pub fn try_deliver(&mut self) -> bool {
        let Some(session) = self.active.as_mut() else {
            return false;
        };

        // A finished task has already sent whatever it was going to send
        let finished = session.is_finished();
        match session.try_take() {
            Some(result) => {
                self.deliver(result);
                true
            }
            None if finished => self.deliver_lost_session(),
            None => false,
        }
    }

    /// Current state
    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Whether a session is in flight
    pub fn is_loading(&self) -> bool {
        self.active.is_some()
    }

    /// The retained successful result, if any
    pub fn last_result(&self) -> Option<&FeedResult> {
        self.retained.as_ref()
    }

    /// URL this controller loads
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The consumer
    pub fn consumer(&self) -> &C {
        &self.consumer
    }

    /// The consumer, mutably
    pub fn consumer_mut(&mut self) -> &mut C {
        &mut self.consumer
    }

    fn begin_load(&mut self) {
        if !self.probe.is_connected() {
            info!(url = %self.url, "No network connectivity, load not started");
            self.set_state(LoadState::NoConnectivity);
            let result =
                FeedResult::Failure(LoadFailure::Connectivity(ConnectivityError::Disconnected));
            self.consumer.on_result(&result);
            return;
        }

        self.active = Some(self.loader.start(self.url.clone()));
        self.set_state(LoadState::Loading);
    }

    fn deliver(&mut self, result: FeedResult) {
        if let Some(session) = self.active.take() {
            info!(
                session = session.id(),
                success = result.is_success(),
                count = result.records().len(),
                "Delivering feed result"
            );
        }

        self.consumer.on_result(&result);
        self.retained = result.is_success().then_some(result);
        self.set_state(LoadState::Delivered);
    }

    // The task exited without sending, which only happens if it panicked
    fn deliver_lost_session(&mut self) -> bool {
        let cancelled = self.active.as_ref().is_some_and(LoadSession::is_cancelled);
        if cancelled {
            self.active = None;
            return false;
        }
        self.deliver(FeedResult::Failure(LoadFailure::Fetch(
            FetchError::TransportError("load task ended without a result".to_string()),
        )));
        true
    }

    fn cancel_active(&mut self) {
        if let Some(mut session) = self.active.take() {
            session.cancel();
            info!(session = session.id(), "Cancelled active load session");
        }
    }

    fn set_state(&mut self, next: LoadState) {
        if self.state != next {
            debug!(from = %self.state, to = %next, "Load state changed");
            self.state = next;
        }
    }
}

impl<C: FeedConsumer> Drop for LoadController<C> {
    fn drop(&mut self) {
        self.cancel_active();
    }
}

impl<C: FeedConsumer> std::fmt::Debug for LoadController<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadController")
            .field("url", &self.url)
            .field("state", &self.state)
            .field("active_session", &self.active.as_ref().map(LoadSession::id))
            .field("retained", &self.retained.is_some())
            .finish_non_exhaustive()
    }
}

//! Cancellable fetch + decode sessions
//!
//! A [`FeedLoader`] turns one URL into one [`FeedResult`]. [`FeedLoader::start`]
//! runs the work on a tokio task and hands back a [`LoadSession`], which owns the
//! receiving end of a one-shot channel. The task sends at most one result, and
//! never after the session has been cancelled, so a cancelled load can't reach a
//! consumer.

use crate::decoder;
use crate::error::{DecodeError, LoadFailure};
use crate::fetcher::FeedFetcher;
use crate::types::FeedResult;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Runs fetch + decode as a single unit of work
///
/// A loader can be started any number of times, but callers must not start a new
/// session while a previous one from the same loader is still outstanding. This
/// is a usage precondition and is not checked at runtime.
pub struct FeedLoader {
    fetcher: Arc<dyn FeedFetcher>,
    next_session: AtomicU64,
}

impl FeedLoader {
    /// Create a loader that retrieves feeds through `fetcher`
    pub fn new(fetcher: Arc<dyn FeedFetcher>) -> Self {
        Self {
            fetcher,
            next_session: AtomicU64::new(1),
        }
    }

    /// Fetch and decode `url` on the current task
    ///
    /// A fetch failure is returned without attempting to decode. Decoding runs on
    /// the blocking pool.
    pub async fn load(&self, url: &str) -> FeedResult {
        run_load(self.fetcher.as_ref(), url).await
    }

    /// Start a background session for `url`
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, url: impl Into<String>) -> LoadSession {
        let id = self.next_session.fetch_add(1, Ordering::Relaxed);
        let url = url.into();
        let cancel_token = CancellationToken::new();
        let (result_tx, result_rx) = oneshot::channel();

        let fetcher = Arc::clone(&self.fetcher);
        let token = cancel_token.clone();
        let task_url = url.clone();

        let handle = tokio::spawn(async move {
            // Cancellation drops the in-flight fetch, which aborts the request
            let outcome = tokio::select! {
                biased;
                _ = token.cancelled() => None,
                result = run_load(fetcher.as_ref(), &task_url) => Some(result),
            };

            match outcome {
                Some(result) if !token.is_cancelled() => {
                    if result_tx.send(result).is_err() {
                        debug!(session = id, "Session receiver gone, result dropped");
                    }
                }
                _ => debug!(session = id, url = %task_url, "Session cancelled, result discarded"),
            }
        });

        info!(session = id, url = %url, "Load session started");

        LoadSession {
            id,
            url,
            cancel_token,
            result_rx,
            handle,
            finished: false,
        }
    }
}

impl std::fmt::Debug for FeedLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedLoader")
            .field("next_session", &self.next_session.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

async fn run_load(fetcher: &dyn FeedFetcher, url: &str) -> FeedResult {
    let bytes = match fetcher.fetch(url).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(url, error = %e, "Failed to fetch feed");
            return FeedResult::Failure(LoadFailure::Fetch(e));
        }
    };

    // Decoding is CPU-bound; keep it off the async workers
    let decoded = tokio::task::spawn_blocking(move || decoder::decode(&bytes)).await;

    match decoded {
        Ok(Ok(records)) => {
            debug!(url, count = records.len(), "Decoded feed");
            FeedResult::Success(records)
        }
        Ok(Err(e)) => {
            warn!(url, error = %e, "Failed to decode feed");
            FeedResult::Failure(LoadFailure::Decode(e))
        }
        Err(e) => {
            warn!(url, error = %e, "Decoder task failed");
            FeedResult::Failure(LoadFailure::Decode(DecodeError::MalformedPayload(format!(
                "decoder task failed: {}",
                e
            ))))
        }
    }
}

/// One outstanding fetch + decode operation
///
/// Yields its result at most once. Dropping a session cancels it.
#[derive(Debug)]
pub struct LoadSession {
    id: u64,
    url: String,
    cancel_token: CancellationToken,
    result_rx: oneshot::Receiver<FeedResult>,
    handle: JoinHandle<()>,
    finished: bool,
}

impl LoadSession {
    /// Session number, unique per loader
    pub fn id(&self) -> u64 {
        self.id
    }

    /// URL being loaded
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Cancel the session
    ///
    /// Any result produced afterwards is discarded. Idempotent.
    pub fn cancel(&mut self) {
        if self.cancel_token.is_cancelled() {
            return;
        }
        self.cancel_token.cancel();
        self.result_rx.close();
        debug!(session = self.id, "Load session cancelled");
    }

    /// Whether [`LoadSession::cancel`] has been called
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Whether the background task has exited
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the result
    ///
    /// Returns `None` if the session was cancelled or its result was already taken.
    /// Cancel-safe: dropping the returned future before completion leaves the
    /// result available to a later call.
    pub async fn wait(&mut self) -> Option<FeedResult> {
        if self.finished || self.is_cancelled() {
            return None;
        }
        let received = (&mut self.result_rx).await;
        self.finished = true;
        received.ok().filter(|_| !self.cancel_token.is_cancelled())
    }

    /// Take the result if it is ready, without waiting
    pub fn try_take(&mut self) -> Option<FeedResult> {
        if self.finished || self.is_cancelled() {
            return None;
        }
        match self.result_rx.try_recv() {
            Ok(result) => {
                self.finished = true;
                Some(result)
            }
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => {
                self.finished = true;
                None
            }
        }
    }
}

impl Drop for LoadSession {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

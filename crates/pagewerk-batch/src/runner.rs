// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch runner — one task per submitted document, joined in submission order.
//
// Each task moves its transformation onto tokio's blocking pool and converts
// whatever happens (success, error, panic) into a `BatchOutcome`. Handles are
// awaited in submission order, so outcome `i` always belongs to path `i` no
// matter which task finishes first. A failing task never affects its siblings.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use pagewerk_core::AppConfig;
use pagewerk_core::error::{PagewerkError, Result};
use pagewerk_core::types::BatchOutcome;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use crate::transform::PageTransform;

/// Applies a [`PageTransform`] to many documents concurrently.
pub struct BatchRunner<T> {
    transform: Arc<T>,
    /// Optional cap on transformations running at the same time.
    limit: Option<Arc<Semaphore>>,
    max_concurrency: Option<usize>,
}

impl<T: PageTransform> BatchRunner<T> {
    /// Runner with one concurrent task per document and no cap.
    pub fn new(transform: T) -> Self {
        Self {
            transform: Arc::new(transform),
            limit: None,
            max_concurrency: None,
        }
    }

    /// Runner honouring the configured concurrency cap.
    pub fn from_config(transform: T, config: &AppConfig) -> Self {
        Self::new(transform).with_max_concurrency(config.max_concurrency)
    }

    /// Cap concurrently running transformations. `None` removes the cap;
    /// `Some(0)` is treated as `Some(1)`.
    pub fn with_max_concurrency(mut self, max_concurrency: Option<usize>) -> Self {
        let max_concurrency = max_concurrency.map(|n| n.max(1));
        self.limit = max_concurrency.map(|n| Arc::new(Semaphore::new(n)));
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn max_concurrency(&self) -> Option<usize> {
        self.max_concurrency
    }

    /// Transform every path and return one outcome per path, in input order.
    ///
    /// Returns only once every task has finished. Individual failures are
    /// reported as [`BatchOutcome::Failure`], never as an error of the batch.
    #[instrument(skip_all, fields(documents = paths.len(), max_concurrency = ?self.max_concurrency))]
    pub async fn run(&self, paths: Vec<PathBuf>) -> Vec<BatchOutcome> {
        info!("Starting batch");

        let mut outcomes = Vec::with_capacity(paths.len());
        for (index, (path, handle)) in self.dispatch(paths).into_iter().enumerate() {
            outcomes.push(settle(index, path, handle.await));
        }

        let failed = outcomes.iter().filter(|o| !o.is_success()).count();
        info!(
            succeeded = outcomes.len() - failed,
            failed, "Batch finished"
        );
        outcomes
    }

    /// Like [`run`](Self::run), but stops waiting at `deadline`.
    ///
    /// Slots whose task had not finished by then are `None`. Their blocking
    /// work is not cancelled and may still write its output file later.
    #[instrument(skip_all, fields(documents = paths.len(), max_concurrency = ?self.max_concurrency))]
    pub async fn run_until(&self, paths: Vec<PathBuf>, deadline: Instant) -> Vec<Option<BatchOutcome>> {
        info!("Starting batch with deadline");

        let mut slots = Vec::with_capacity(paths.len());
        for (index, (path, handle)) in self.dispatch(paths).into_iter().enumerate() {
            // The handle is polled before the deadline, so finished tasks
            // still report after it has passed.
            match tokio::time::timeout_at(deadline, handle).await {
                Ok(joined) => slots.push(Some(settle(index, path, joined))),
                Err(_) => {
                    warn!(index, path = %path.display(), "Deadline passed, abandoning document");
                    slots.push(None);
                }
            }
        }
        slots
    }

    /// Blocking wrapper around [`run`](Self::run) for synchronous callers.
    ///
    /// Fails only when the async runtime cannot be started, including when
    /// called from inside an existing tokio runtime.
    pub fn run_blocking(&self, paths: Vec<PathBuf>) -> Result<Vec<BatchOutcome>> {
        let runtime = build_runtime()?;
        Ok(runtime.block_on(self.run(paths)))
    }

    /// Blocking wrapper around [`run_until`](Self::run_until) with a timeout
    /// measured from now.
    pub fn run_blocking_until(
        &self,
        paths: Vec<PathBuf>,
        timeout: Duration,
    ) -> Result<Vec<Option<BatchOutcome>>> {
        let runtime = build_runtime()?;
        let slots = runtime.block_on(async {
            let deadline = Instant::now() + timeout;
            self.run_until(paths, deadline).await
        });
        // Abandoned blocking tasks must not hold up the caller.
        runtime.shutdown_background();
        Ok(slots)
    }

    /// Spawn one task per path. Handles are returned in submission order.
    fn dispatch(&self, paths: Vec<PathBuf>) -> Vec<(PathBuf, JoinHandle<BatchOutcome>)> {
        paths
            .into_iter()
            .enumerate()
            .map(|(index, path)| {
                let task = transform_one(
                    Arc::clone(&self.transform),
                    self.limit.clone(),
                    index,
                    path.clone(),
                );
                (path, tokio::spawn(task))
            })
            .collect()
    }
}

/// Run a single transformation and capture its result as an outcome.
async fn transform_one<T: PageTransform>(
    transform: Arc<T>,
    limit: Option<Arc<Semaphore>>,
    index: usize,
    path: PathBuf,
) -> BatchOutcome {
    // Held until the transformation has finished.
    let _permit = match limit {
        Some(semaphore) => match semaphore.acquire_owned().await {
            Ok(permit) => Some(permit),
            Err(err) => return aborted(index, path, &err.to_string()),
        },
        None => None,
    };

    let source = path.clone();
    match tokio::task::spawn_blocking(move || transform.transform(&source)).await {
        Ok(Ok(output)) => {
            debug!(index, output = %output.display(), "Document reordered");
            BatchOutcome::success(index, path, output)
        }
        Ok(Err(err)) => {
            warn!(index, path = %path.display(), error = %err, "Document failed");
            BatchOutcome::from_error(index, path, &err)
        }
        Err(join_err) => aborted(index, path, &join_err.to_string()),
    }
}

/// Convert a joined task into its outcome.
fn settle(index: usize, path: PathBuf, joined: std::result::Result<BatchOutcome, JoinError>) -> BatchOutcome {
    joined.unwrap_or_else(|err| aborted(index, path, &err.to_string()))
}

fn aborted(index: usize, path: PathBuf, detail: &str) -> BatchOutcome {
    error!(index, path = %path.display(), detail, "Batch task aborted");
    let err = PagewerkError::TaskAborted(format!("{}: {detail}", path.display()));
    BatchOutcome::from_error(index, path, &err)
}

fn build_runtime() -> Result<tokio::runtime::Runtime> {
    if tokio::runtime::Handle::try_current().is_ok() {
        return Err(PagewerkError::Runtime(
            "blocking batch run requested from inside an async runtime; use run or run_until".to_string(),
        ));
    }
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| PagewerkError::Runtime(err.to_string()))
}

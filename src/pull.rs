//! Progress aggregation for `/api/pull` model downloads.
//!
//! One pull is made up of several digest-identified layer downloads running
//! concurrently on the server, followed by verification and a manifest
//! write. The server reports per-layer byte counts; this module folds them
//! into a single overall percentage, updated incrementally by delta rather
//! than by re-summing.
//!
//! There is no cancellation path for pulls; dropping the in-flight future
//! aborts the underlying transfer.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use futures::StreamExt;

use crate::error::ClientError;
use crate::ndjson::json_lines;
use crate::types::PullEvent;

/// One progress report delivered to the pull sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullProgress {
    /// Overall download percentage across all layers.
    ///
    /// Usually 0..=100, but a layer that never declares its total size
    /// contributes downloaded bytes without growing the denominator, so the
    /// value can exceed 100. This mirrors the server's reporting; clamping
    /// for display is up to the caller.
    Downloading(i64),
    /// Post-download phase: digest verification and manifest write.
    Installing,
}

/// Aggregates per-layer pull events into overall progress.
///
/// Owned exclusively by one in-flight pull; concurrent pulls of different
/// models each get their own tracker.
#[derive(Debug, Default)]
pub(crate) struct PullTracker {
    /// Bytes completed so far, keyed by layer digest. A layer's declared
    /// total is folded into `total_size` the first time its digest appears.
    completed_by_digest: HashMap<String, u64>,
    total_size: i64,
    completed_size: i64,
}

impl PullTracker {
    /// Fold one stream event into the aggregate, returning the progress
    /// report to deliver, if any.
    pub(crate) fn apply(&mut self, event: &PullEvent) -> Option<PullProgress> {
        if event.status.starts_with("pulling") {
            let Some(digest) = event.digest.as_deref() else {
                tracing::debug!(status = %event.status, "pulling event without digest, ignoring");
                return None;
            };

            let prev_completed = match self.completed_by_digest.entry(digest.to_string()) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    self.total_size += event.total.unwrap_or(0) as i64;
                    entry.insert(0)
                }
            };
            if let Some(completed) = event.completed {
                self.completed_size += completed as i64 - *prev_completed as i64;
                *prev_completed = completed;
            }

            if self.total_size > 0 {
                let percent =
                    (self.completed_size as f64 / self.total_size as f64 * 100.0).round() as i64;
                return Some(PullProgress::Downloading(percent));
            }
            None
        } else if matches!(
            event.status.as_str(),
            "verifying sha256 digest" | "writing manifest" | "success"
        ) {
            Some(PullProgress::Installing)
        } else {
            None
        }
    }
}

/// Consume a streaming `/api/pull` response, delivering each progress
/// report to `on_progress` in arrival order.
///
/// Resolves when the stream closes; the server's final `"success"` line is
/// reported as [`PullProgress::Installing`], with no separate done signal.
pub(crate) async fn consume(
    response: reqwest::Response,
    on_progress: &mut dyn FnMut(PullProgress),
) -> Result<(), ClientError> {
    let mut tracker = PullTracker::default();
    let mut lines = std::pin::pin!(json_lines(response.bytes_stream()));

    while let Some(item) = lines.next().await {
        let event: PullEvent = match serde_json::from_value(item?) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(error = %e, "skipping pull line with unexpected shape");
                continue;
            }
        };
        if let Some(progress) = tracker.apply(&event) {
            on_progress(progress);
        }
    }

    Ok(())
}

use super::registry::{SampleBuffer, VersionStamp};
use super::segments::{compute_match, MatchReport, MatchSegment};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Matched,
    Unmatched,
}

/// Receiver of highlight updates.
///
/// `show` replaces every highlight of `phase` for `key` with `segments`; an empty slice clears
/// them. Calls may arrive from a tokio worker thread.
pub trait HighlightSink<K>: Send + Sync + 'static {
    fn show(&self, key: &K, phase: Phase, segments: &[MatchSegment]);
}

/// Debounced highlighting of sample text.
///
/// Every refresh shows the matched segments at once and clears the unmatched ones. Unmatched
/// segments are shown after the debounce interval, unless the sample buffer changed in the
/// meantime or a later refresh for the same key replaced them.
///
/// `refresh` spawns onto the current tokio runtime and must be called from within one.
pub struct LiveMatchEngine<K, S> {
    sink: Arc<S>,
    debounce: Duration,
    pending: Mutex<HashMap<K, JoinHandle<()>>>,
}

impl<K, S> LiveMatchEngine<K, S>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    S: HighlightSink<K>,
{
    pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

    pub fn new(sink: Arc<S>) -> Self {
        Self::with_debounce(sink, Self::DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(sink: Arc<S>, debounce: Duration) -> Self {
        Self {
            sink,
            debounce,
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn sink(&self) -> &Arc<S> {
        &self.sink
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Match the buffer's sample against `grammar` and publish the result.
    pub fn refresh(&self, key: &K, grammar: &str, buffer: &SampleBuffer) -> MatchReport {
        let captured = buffer.version();
        let report = compute_match(grammar, buffer.text());
        self.publish(key, &report, buffer.stamp(), captured);
        report
    }

    /// Publish an already computed report for a buffer whose version was `captured`.
    pub fn publish(&self, key: &K, report: &MatchReport, stamp: VersionStamp, captured: u64) {
        let (matched, unmatched): (Vec<MatchSegment>, Vec<MatchSegment>) = report
            .segments
            .iter()
            .cloned()
            .partition(|segment| segment.matched);

        // held from cancel to insert: at most one pending task per key
        let mut pending = self.pending();
        if let Some(previous) = pending.remove(key) {
            previous.abort();
        }
        self.sink.show(key, Phase::Matched, &matched);
        self.sink.show(key, Phase::Unmatched, &[]);
        if unmatched.is_empty() {
            return;
        }

        let sink = Arc::clone(&self.sink);
        let task_key = key.clone();
        let delay = self.debounce;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if stamp.current() != captured {
                log::trace!("dropping stale unmatched segments");
                return;
            }
            sink.show(&task_key, Phase::Unmatched, &unmatched);
        });
        if let Some(previous) = pending.insert(key.clone(), handle) {
            previous.abort();
        }
    }

    /// Abort pending work for `key`.
    pub fn forget(&self, key: &K) {
        self.cancel(key);
    }

    pub fn has_pending(&self, key: &K) -> bool {
        self.pending()
            .get(key)
            .is_some_and(|handle| !handle.is_finished())
    }

    fn cancel(&self, key: &K) {
        if let Some(handle) = self.pending().remove(key) {
            handle.abort();
        }
    }

    fn pending(&self) -> MutexGuard<'_, HashMap<K, JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K, S> Drop for LiveMatchEngine<K, S> {
    fn drop(&mut self) {
        let pending = self
            .pending
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        for (_, handle) in pending.drain() {
            handle.abort();
        }
    }
}

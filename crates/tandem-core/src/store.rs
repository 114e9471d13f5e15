//! Timeline store — the ordered timeline plus its transient UI state.
//!
//! One store backs one user session. It is exclusively mutated by the
//! single active run; the busy gate makes that exclusivity explicit, so no
//! locking beyond the gate and the interior mutex is required.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::ProxyError;
use crate::models::{CopyStatus, TimelineEntry};

/// A transient copy-status marker auto-clears after this long.
const COPY_STATUS_TTL: Duration = Duration::from_millis(1500);

struct Inner {
    entries: Vec<TimelineEntry>,
    /// Position → (status, generation). The generation lets each delayed
    /// reset clear only the mark it was scheduled for, so overlapping marks
    /// never cancel newer state.
    copy_status: HashMap<usize, (CopyStatus, u64)>,
    next_generation: u64,
}

/// Shared handle to one session's timeline. Cheap to clone.
#[derive(Clone)]
pub struct TimelineStore {
    inner: Arc<Mutex<Inner>>,
    running: Arc<AtomicBool>,
}

/// Claim on the busy gate; released when dropped, on every exit path.
pub struct RunGuard {
    running: Arc<AtomicBool>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

impl TimelineStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                entries: Vec::new(),
                copy_status: HashMap::new(),
                next_generation: 0,
            })),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Atomically claim the store for one run.
    ///
    /// A second invocation while a run is in progress is rejected rather
    /// than queued or ignored, closing the programmatic double-call path
    /// the triggering-control flag alone leaves open.
    pub fn begin_run(&self) -> Result<RunGuard, ProxyError> {
        self.running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| ProxyError::Busy)?;
        Ok(RunGuard {
            running: self.running.clone(),
        })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Discard the prior timeline and set a new ordered sequence.
    pub fn replace(&self, entries: Vec<TimelineEntry>) {
        let mut inner = self.inner.lock().unwrap();
        inner.entries = entries;
        inner.copy_status.clear();
    }

    /// Add to the end, preserving existing entries and their state.
    pub fn append(&self, entries: Vec<TimelineEntry>) {
        let mut inner = self.inner.lock().unwrap();
        inner.entries.extend(entries);
    }

    /// Flip exactly one entry's `expanded` flag. Out-of-range is a no-op.
    pub fn toggle_expanded(&self, index: usize) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(entry) = inner.entries.get_mut(index) {
            entry.expanded = !entry.expanded;
        }
    }

    /// Set a transient copy status for `index`; it auto-clears after 1.5s.
    ///
    /// The reset is a delayed task rather than a manual clear, so copy
    /// actions on different entries don't interfere with each other's
    /// timers.
    pub fn mark_copy(&self, index: usize, status: CopyStatus) {
        let generation = {
            let mut inner = self.inner.lock().unwrap();
            let generation = inner.next_generation;
            inner.next_generation += 1;
            inner.copy_status.insert(index, (status, generation));
            generation
        };

        let inner = self.inner.clone();
        tokio::spawn(async move {
            tokio::time::sleep(COPY_STATUS_TTL).await;
            let mut inner = inner.lock().unwrap();
            // Only clear the mark this reset was scheduled for.
            if matches!(inner.copy_status.get(&index), Some((_, g)) if *g == generation) {
                inner.copy_status.remove(&index);
            }
        });
    }

    pub fn copy_status(&self, index: usize) -> Option<CopyStatus> {
        self.inner
            .lock()
            .unwrap()
            .copy_status
            .get(&index)
            .map(|(status, _)| *status)
    }

    /// Snapshot of the current timeline in display order.
    pub fn entries(&self) -> Vec<TimelineEntry> {
        self.inner.lock().unwrap().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TimelineStore {
    fn default() -> Self {
        Self::new()
    }
}

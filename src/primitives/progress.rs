//! Progress observation and cooperative cancellation.
//!
//! ## Purpose
//!
//! This module provides the cross-cutting run state shared between filter
//! workers: an observer list for progress events, an atomic aggregator
//! that keeps reported completion fractions monotonically non-decreasing
//! under concurrency, and a cancellation token checked between batches.
//!
//! ## Design notes
//!
//! * **Observer List**: any number of observers may be registered,
//!   including none; observers are notified from whichever thread
//!   completes a batch.
//! * **Isolated Dispatch**: under `std`, a panicking observer is caught
//!   per call and never affects other observers or the computation.
//! * **Monotonic Fractions**: concurrent batch completions race on an
//!   atomic maximum; only a strictly higher fraction is dispatched, so no
//!   observer ever sees progress go backwards.
//! * **Cooperative Cancellation**: cancellation is a shared flag; workers
//!   poll it between batches and abandon the run without producing a
//!   partial result.
//!
//! ## Invariants
//!
//! * Dispatched fractions are in `[0, 1]` and non-decreasing per run.
//!
//! ## Non-goals
//!
//! * This module does not dispatch observers asynchronously; callbacks
//!   must be cheap or hand off to the host.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::sync::Arc;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::sync::Arc;
#[cfg(feature = "std")]
use std::vec::Vec;

use core::ops::Range;
use core::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

// ============================================================================
// Progress Event
// ============================================================================

/// One progress notification from a running filter.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    /// Completion fraction in `[0, 1]`, non-decreasing within a run.
    fraction: f64,

    /// Location-axis index range of the grid columns just completed, when
    /// the event corresponds to a batch.
    completed_locations: Option<Range<usize>>,
}

impl ProgressEvent {
    /// Create an event for a completed batch of grid columns.
    pub fn new(fraction: f64, completed_locations: Option<Range<usize>>) -> Self {
        Self { fraction, completed_locations }
    }

    /// Completion fraction in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// Location-axis index range of the grid columns just completed.
    pub fn completed_locations(&self) -> Option<&Range<usize>> {
        self.completed_locations.as_ref()
    }
}

// ============================================================================
// Observer
// ============================================================================

/// Observer of filter progress events.
///
/// Implemented for any `Fn(&ProgressEvent)` closure. Callbacks run on the
/// worker thread that completed the batch and must not block.
pub trait ProgressObserver: Send + Sync {
    /// Called with each progress event.
    fn on_progress(&self, event: &ProgressEvent);
}

impl<F> ProgressObserver for F
where
    F: Fn(&ProgressEvent) + Send + Sync,
{
    fn on_progress(&self, event: &ProgressEvent) {
        self(event)
    }
}

/// Registered observers of one engine.
#[derive(Default)]
pub struct ObserverSet {
    /// Observers in registration order.
    observers: Vec<Arc<dyn ProgressObserver>>,
}

impl ObserverSet {
    /// Create an empty observer set.
    pub fn new() -> Self {
        Self { observers: Vec::new() }
    }

    /// Register an observer.
    pub fn register<O: ProgressObserver + 'static>(&mut self, observer: O) {
        self.observers.push(Arc::new(observer));
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Whether no observers are registered.
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Notify all observers, isolating failures per observer.
    pub fn notify(&self, event: &ProgressEvent) {
        for observer in &self.observers {
            #[cfg(feature = "std")]
            {
                let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    observer.on_progress(event);
                }));
            }
            #[cfg(not(feature = "std"))]
            observer.on_progress(event);
        }
    }
}

impl core::fmt::Debug for ObserverSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ObserverSet").field("observers", &self.observers.len()).finish()
    }
}

// ============================================================================
// Progress Aggregator
// ============================================================================

/// Atomic aggregation of completed cells into monotonic fractions.
///
/// Workers record completed cell counts; only the completion that raises
/// the running maximum fraction yields a value to dispatch, so concurrent
/// out-of-order completions never report a decreasing fraction.
#[derive(Debug)]
pub struct ProgressAggregator {
    /// Total number of grid cells in the run.
    total: usize,

    /// Cells completed so far.
    completed: AtomicUsize,

    /// Bit pattern of the highest fraction handed out for dispatch.
    reported: AtomicU64,
}

impl ProgressAggregator {
    /// Create an aggregator for a run over `total` grid cells.
    pub fn new(total: usize) -> Self {
        Self { total: total.max(1), completed: AtomicUsize::new(0), reported: AtomicU64::new(0) }
    }

    /// Record `cells` newly completed cells.
    ///
    /// Returns the new completion fraction if it exceeds every fraction
    /// returned before, `None` otherwise.
    pub fn record(&self, cells: usize) -> Option<f64> {
        let done = self.completed.fetch_add(cells, Ordering::AcqRel) + cells;
        let fraction = (done as f64 / self.total as f64).min(1.0);
        let mut current = self.reported.load(Ordering::Acquire);
        loop {
            if f64::from_bits(current) >= fraction {
                return None;
            }
            match self.reported.compare_exchange_weak(
                current,
                fraction.to_bits(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Some(fraction),
                Err(observed) => current = observed,
            }
        }
    }

    /// Fraction of cells completed so far.
    pub fn fraction(&self) -> f64 {
        (self.completed.load(Ordering::Acquire) as f64 / self.total as f64).min(1.0)
    }
}

// ============================================================================
// Cancellation
// ============================================================================

/// Shared flag for cooperatively aborting a running filter.
///
/// Clones share the same flag. Workers poll the flag between batches; a
/// cancelled run yields no result rather than a truncated one.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    /// Shared cancellation flag.
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token in the not-cancelled state.
    pub fn new() -> Self {
        Self { flag: Arc::new(AtomicBool::new(false)) }
    }

    /// Request cancellation of the associated run.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Clear the flag so the engine can be reused for another run.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::Release);
    }
}

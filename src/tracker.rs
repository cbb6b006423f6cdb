//! Batch-scoped progress accounting for notification sends and cell writes.
//!
//! Every send is the user-visible, slow, risky half of its pair; the paired
//! status write is a fast confirmation. The aggregate percentage therefore
//! weighs sends at 67% and writes at 33% whenever a batch contains both.
//!
//! Totals grow at operation creation time, not at start of execution, so the
//! denominator is stable while a batch is still being assembled. Worker
//! completions race against each other; all counter updates go through one
//! mutex.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// The two kinds of in-flight operation a batch produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Send,
    Write,
}

/// How a dispatched operation finished. Failures still count toward progress;
/// they are surfaced separately by the batch outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpOutcome {
    Succeeded,
    Failed,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub sends_total: u32,
    pub sends_done: u32,
    pub writes_total: u32,
    pub writes_done: u32,
}

/// Counters for one batch of operations.
#[derive(Debug, Default)]
pub struct OperationTracker {
    counters: Mutex<ProgressSnapshot>,
    suppress_write_progress: AtomicBool,
}

impl OperationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zeroes all counters. Call at the start of every batch; counters are
    /// never shared across batches.
    pub fn begin_batch(&self) {
        let mut c = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        *c = ProgressSnapshot::default();
    }

    /// Registers a newly created operation, growing the matching total.
    pub fn enqueue(&self, kind: OpKind) {
        let mut c = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        match kind {
            OpKind::Send => c.sends_total += 1,
            OpKind::Write => c.writes_total += 1,
        }
    }

    /// Records a finished operation, successful or not.
    pub fn complete(&self, kind: OpKind, _outcome: OpOutcome) {
        let mut c = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        match kind {
            OpKind::Send => c.sends_done += 1,
            OpKind::Write => c.writes_done += 1,
        }
    }

    /// Removes an operation that was abandoned before execution (a declined
    /// confirmation, or a write whose enabling send failed). Never touches a
    /// done counter.
    pub fn cancel(&self, kind: OpKind) {
        let mut c = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        match kind {
            OpKind::Send => c.sends_total = c.sends_total.saturating_sub(1),
            OpKind::Write => c.writes_total = c.writes_total.saturating_sub(1),
        }
    }

    /// Hides write-only progress, used while a preparatory save runs ahead of
    /// a notification batch.
    pub fn set_suppress_write_progress(&self, on: bool) {
        self.suppress_write_progress.store(on, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        *self.counters.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Aggregate progress of the current batch as an integer 0..=100.
    ///
    /// Write-only batches report plain write completion (unless suppressed);
    /// mixed batches report `67 * send fraction + 33 * write fraction`.
    pub fn percent(&self) -> u8 {
        let c = self.snapshot();
        let suppressed = self.suppress_write_progress.load(Ordering::Relaxed);

        let progress = if c.sends_total == 0 && c.writes_total > 0 && !suppressed {
            (100.0 * f64::from(c.writes_done) / f64::from(c.writes_total)).round()
        } else if c.sends_total > 0 && c.writes_total > 0 {
            let send_part = 67.0 * f64::from(c.sends_done) / f64::from(c.sends_total);
            let write_part = 33.0 * f64::from(c.writes_done) / f64::from(c.writes_total);
            (send_part + write_part).round()
        } else {
            0.0
        };

        progress.clamp(0.0, 100.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> OperationTracker {
        let t = OperationTracker::new();
        t.begin_batch();
        t
    }

    #[test]
    fn empty_batch_is_zero() {
        assert_eq!(tracker().percent(), 0);
    }

    #[test]
    fn write_only_batch_reports_write_completion() {
        let t = tracker();
        for _ in 0..5 {
            t.enqueue(OpKind::Write);
        }
        assert_eq!(t.percent(), 0);
        for _ in 0..5 {
            t.complete(OpKind::Write, OpOutcome::Succeeded);
        }
        assert_eq!(t.percent(), 100);
    }

    #[test]
    fn suppressed_write_only_batch_stays_at_zero() {
        let t = tracker();
        t.set_suppress_write_progress(true);
        t.enqueue(OpKind::Write);
        t.complete(OpKind::Write, OpOutcome::Succeeded);
        assert_eq!(t.percent(), 0);
        t.set_suppress_write_progress(false);
        assert_eq!(t.percent(), 100);
    }

    #[test]
    fn mixed_batch_weights_sends_67_writes_33() {
        let t = tracker();
        for _ in 0..4 {
            t.enqueue(OpKind::Send);
            t.enqueue(OpKind::Write);
        }
        for _ in 0..2 {
            t.complete(OpKind::Send, OpOutcome::Succeeded);
        }
        for _ in 0..4 {
            t.complete(OpKind::Write, OpOutcome::Succeeded);
        }
        // round(67 * 0.5 + 33 * 1.0) = round(66.5) = 67
        assert_eq!(t.percent(), 67);
    }

    #[test]
    fn send_only_batch_reports_zero() {
        let t = tracker();
        t.enqueue(OpKind::Send);
        t.complete(OpKind::Send, OpOutcome::Succeeded);
        assert_eq!(t.percent(), 0);
    }

    #[test]
    fn failed_operations_still_count_as_done() {
        let t = tracker();
        t.enqueue(OpKind::Send);
        t.enqueue(OpKind::Write);
        t.complete(OpKind::Send, OpOutcome::Failed);
        t.complete(OpKind::Write, OpOutcome::Failed);
        assert_eq!(t.percent(), 100);
    }

    #[test]
    fn cancel_shrinks_totals_but_never_done() {
        let t = tracker();
        for _ in 0..3 {
            t.enqueue(OpKind::Write);
        }
        t.complete(OpKind::Write, OpOutcome::Succeeded);
        t.cancel(OpKind::Write);
        let c = t.snapshot();
        assert_eq!(c.writes_total, 2);
        assert_eq!(c.writes_done, 1);
        assert_eq!(t.percent(), 50);
    }

    #[test]
    fn cancel_on_empty_batch_saturates() {
        let t = tracker();
        t.cancel(OpKind::Send);
        t.cancel(OpKind::Write);
        assert_eq!(t.snapshot(), ProgressSnapshot::default());
    }

    #[test]
    fn progress_is_monotonic_under_completion() {
        let t = tracker();
        for _ in 0..5 {
            t.enqueue(OpKind::Send);
            t.enqueue(OpKind::Write);
        }
        let mut last = t.percent();
        for _ in 0..5 {
            t.complete(OpKind::Send, OpOutcome::Succeeded);
            let p = t.percent();
            assert!(p >= last);
            last = p;
            t.complete(OpKind::Write, OpOutcome::Succeeded);
            let p = t.percent();
            assert!(p >= last);
            last = p;
        }
        assert_eq!(last, 100);
    }

    #[test]
    fn begin_batch_resets_counters() {
        let t = tracker();
        t.enqueue(OpKind::Send);
        t.complete(OpKind::Send, OpOutcome::Succeeded);
        t.begin_batch();
        assert_eq!(t.snapshot(), ProgressSnapshot::default());
    }
}

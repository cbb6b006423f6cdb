//! Batch dispatch of notification/write pairs and of standalone cell writes.
//!
//! A batch registers every operation with the tracker up front so the
//! progress denominator is stable, then walks the pairs under the operator's
//! review. Each confirmed pair runs on its own task: the send executes
//! first, and only a successful send dispatches the linked status write, so
//! a candidate is never marked notified when nothing was delivered.
//! Completion order across pairs is unspecified.
//!
//! Skips are cooperative: they cancel operations that have not been handed
//! to a worker yet, and never interrupt one that has.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinSet;
use uuid::Uuid;

use crate::compose;
use crate::error::HostbookError;
use crate::mailer::{MessageTransport, OutboundMessage};
use crate::presets::Presets;
use crate::sheets::{CellWrite, RecordStore};
use crate::sync::Projection;
use crate::tracker::{OpKind, OpOutcome, OperationTracker};
use crate::ui::BatchProgress;
use crate::workflow::{StatusWorkflow, Trigger};

/// The two notification flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Confirm to a candidate that their request was received.
    Receipt,
    /// Announce the assigned host to a candidate, host cc'd.
    Pairing,
}

impl NotificationKind {
    pub fn subject(self) -> &'static str {
        match self {
            NotificationKind::Receipt => "Hosting Request Confirmation",
            NotificationKind::Pairing => "Hosting Pairing Info",
        }
    }
}

/// One candidate's send plus the status write that records the delivery.
#[derive(Debug, Clone)]
pub struct OpPair {
    pub candidate: String,
    pub message: OutboundMessage,
    pub status_write: CellWrite,
}

/// The pairs a projection yields, plus the candidates left out because a
/// required field was blank.
#[derive(Debug, Clone, Default)]
pub struct PairSet {
    pub pairs: Vec<OpPair>,
    pub incomplete: Vec<String>,
}

/// Operator decision for one pair during stepwise review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewDecision {
    Confirm,
    /// Confirm with edited recipients and/or body; `None` keeps the drafted
    /// value. Recipient strings are comma-separated address lists.
    ConfirmEdited {
        to: Option<String>,
        cc: Option<String>,
        body: Option<String>,
    },
    Skip,
    SkipAll,
}

/// The coordinating context's per-candidate confirmation hook.
pub trait Reviewer {
    fn review(&mut self, pair: &OpPair) -> ReviewDecision;
}

/// Dispatches every pair unreviewed; the launch-all mode.
pub struct LaunchAll;

impl Reviewer for LaunchAll {
    fn review(&mut self, _pair: &OpPair) -> ReviewDecision {
        ReviewDecision::Confirm
    }
}

/// What a notification batch did, stamped for the audit trail.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub batch_id: String,
    pub delivered: Vec<String>,
    pub send_failures: Vec<(String, String)>,
    pub write_failures: Vec<(String, String)>,
    pub skipped: Vec<String>,
    pub cancelled: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: i64,
}

/// Result of a standalone write batch.
#[derive(Debug, Clone, Serialize)]
pub struct SaveOutcome {
    pub written: usize,
    pub failures: Vec<String>,
}

/// Builds the send/write pairs for one notification flow over a projection.
///
/// Pairing announcements require host name, host email, hosting date,
/// candidate name and candidate email to all be present; candidates missing
/// any of those are reported in `incomplete` instead of producing a pair.
pub fn build_pairs(
    kind: NotificationKind,
    projection: &Projection,
    presets: &Presets,
    signature: &str,
    tracked_sheet: &str,
) -> Result<PairSet, HostbookError> {
    let mut set = PairSet::default();

    for candidate in &projection.rows {
        let (body, cc) = match kind {
            NotificationKind::Receipt => (
                compose::receipt_message(&presets.receipt_body, candidate, signature),
                Vec::new(),
            ),
            NotificationKind::Pairing => {
                let required = [
                    &candidate.host_name,
                    &candidate.host_email,
                    &candidate.hosting_date,
                    &candidate.name,
                    &candidate.email,
                ];
                if required.iter().any(|field| field.is_empty()) {
                    set.incomplete.push(display_name(candidate));
                    continue;
                }
                (
                    compose::pairing_message(&presets.pairing_body, candidate, signature),
                    vec![candidate.host_email.clone()],
                )
            }
        };

        let advanced = StatusWorkflow::next_on_delivery(candidate.status).ok_or(
            crate::workflow::TransitionError::NotAutomatic {
                from: candidate.status,
                to: candidate.status,
            },
        )?;
        let status_write = StatusWorkflow::transition(
            tracked_sheet,
            candidate.row,
            candidate.status,
            advanced,
            Trigger::Delivered,
        )?;

        set.pairs.push(OpPair {
            candidate: display_name(candidate),
            message: OutboundMessage {
                subject: kind.subject().to_string(),
                to: vec![candidate.email.clone()],
                cc,
                html_body: body,
            },
            status_write,
        });
    }
    Ok(set)
}

fn display_name(candidate: &crate::record::Candidate) -> String {
    if candidate.name.is_empty() {
        format!("row {}", candidate.row)
    } else {
        candidate.name.clone()
    }
}

fn split_recipients(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

enum PairResult {
    Delivered(String),
    SendFailed(String, String),
    WriteFailed(String, String),
}

/// Runs a notification batch over pre-built pairs.
///
/// All pairs are registered with the tracker before review begins. The
/// reviewer is consulted per pair unless `launch_all` is set; confirmed
/// pairs are spawned immediately and keep running while review continues.
pub async fn run_notification_batch<S, M, R>(
    store: &S,
    transport: &M,
    tracker: &Arc<OperationTracker>,
    progress: &BatchProgress,
    pairs: Vec<OpPair>,
    reviewer: &mut R,
    launch_all: bool,
) -> BatchOutcome
where
    S: RecordStore + Clone + Send + Sync + 'static,
    M: MessageTransport + Clone + Send + Sync + 'static,
    R: Reviewer,
{
    let batch_id = Uuid::new_v4().to_string();
    let started_at = Utc::now();

    for _ in &pairs {
        tracker.enqueue(OpKind::Send);
        tracker.enqueue(OpKind::Write);
    }
    progress.refresh();

    let mut delivered = Vec::new();
    let mut send_failures = Vec::new();
    let mut write_failures = Vec::new();
    let mut skipped = Vec::new();
    let mut cancelled = 0;

    let mut workers: JoinSet<PairResult> = JoinSet::new();
    let mut remaining = pairs.into_iter();

    while let Some(mut pair) = remaining.next() {
        let decision = if launch_all {
            ReviewDecision::Confirm
        } else {
            reviewer.review(&pair)
        };
        match decision {
            ReviewDecision::Confirm => {
                spawn_pair(&mut workers, store, transport, tracker, pair);
            }
            ReviewDecision::ConfirmEdited { to, cc, body } => {
                if let Some(to) = to {
                    pair.message.to = split_recipients(&to);
                }
                if let Some(cc) = cc {
                    pair.message.cc = split_recipients(&cc);
                }
                if let Some(body) = body {
                    pair.message.html_body = body;
                }
                spawn_pair(&mut workers, store, transport, tracker, pair);
            }
            ReviewDecision::Skip => {
                tracker.cancel(OpKind::Send);
                tracker.cancel(OpKind::Write);
                cancelled += 1;
                skipped.push(pair.candidate);
                progress.refresh();
            }
            ReviewDecision::SkipAll => {
                tracker.cancel(OpKind::Send);
                tracker.cancel(OpKind::Write);
                cancelled += 1;
                skipped.push(pair.candidate);
                for later in remaining.by_ref() {
                    tracker.cancel(OpKind::Send);
                    tracker.cancel(OpKind::Write);
                    cancelled += 1;
                    skipped.push(later.candidate);
                }
                progress.refresh();
            }
        }
    }

    while let Some(joined) = workers.join_next().await {
        progress.refresh();
        match joined {
            Ok(PairResult::Delivered(name)) => delivered.push(name),
            Ok(PairResult::SendFailed(name, err)) => send_failures.push((name, err)),
            Ok(PairResult::WriteFailed(name, err)) => write_failures.push((name, err)),
            Err(err) => send_failures.push(("<worker>".into(), err.to_string())),
        }
    }
    progress.refresh();

    let finished_at = Utc::now();
    BatchOutcome {
        batch_id,
        delivered,
        send_failures,
        write_failures,
        skipped,
        cancelled,
        started_at,
        finished_at,
        duration_ms: (finished_at - started_at).num_milliseconds(),
    }
}

fn spawn_pair<S, M>(
    workers: &mut JoinSet<PairResult>,
    store: &S,
    transport: &M,
    tracker: &Arc<OperationTracker>,
    pair: OpPair,
) where
    S: RecordStore + Clone + Send + Sync + 'static,
    M: MessageTransport + Clone + Send + Sync + 'static,
{
    let store = store.clone();
    let transport = transport.clone();
    let tracker = Arc::clone(tracker);
    workers.spawn(async move {
        match transport.send(&pair.message).await {
            Ok(()) => {
                tracker.complete(OpKind::Send, OpOutcome::Succeeded);
                // The write is the continuation of a delivered send.
                match store
                    .write_cell(&pair.status_write.address, &pair.status_write.value)
                    .await
                {
                    Ok(()) => {
                        tracker.complete(OpKind::Write, OpOutcome::Succeeded);
                        PairResult::Delivered(pair.candidate)
                    }
                    Err(err) => {
                        tracker.complete(OpKind::Write, OpOutcome::Failed);
                        PairResult::WriteFailed(pair.candidate, err.to_string())
                    }
                }
            }
            Err(err) => {
                tracker.complete(OpKind::Send, OpOutcome::Failed);
                // Undelivered: the linked write is abandoned, not executed.
                tracker.cancel(OpKind::Write);
                PairResult::SendFailed(pair.candidate, err.to_string())
            }
        }
    });
}

/// Dispatches standalone cell writes (saving edited working rows).
pub async fn run_save_batch<S>(
    store: &S,
    tracker: &Arc<OperationTracker>,
    progress: &BatchProgress,
    writes: Vec<CellWrite>,
) -> SaveOutcome
where
    S: RecordStore + Clone + Send + Sync + 'static,
{
    for _ in &writes {
        tracker.enqueue(OpKind::Write);
    }
    progress.refresh();

    let mut workers: JoinSet<Result<(), String>> = JoinSet::new();
    for write in writes {
        let store = store.clone();
        let tracker = Arc::clone(tracker);
        workers.spawn(async move {
            match store.write_cell(&write.address, &write.value).await {
                Ok(()) => {
                    tracker.complete(OpKind::Write, OpOutcome::Succeeded);
                    Ok(())
                }
                Err(err) => {
                    tracker.complete(OpKind::Write, OpOutcome::Failed);
                    Err(format!("{}: {err}", write.address))
                }
            }
        });
    }

    let mut outcome = SaveOutcome {
        written: 0,
        failures: Vec::new(),
    };
    while let Some(joined) = workers.join_next().await {
        progress.refresh();
        match joined {
            Ok(Ok(())) => outcome.written += 1,
            Ok(Err(failure)) => outcome.failures.push(failure),
            Err(err) => outcome.failures.push(err.to_string()),
        }
    }
    outcome
}

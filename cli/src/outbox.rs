//! Persistence outbox: ordered, retried delivery of board and note writes.
//!
//! DESIGN
//! ======
//! Local state is already updated when a write reaches the outbox. A single
//! worker drains a bounded queue in FIFO order, so writes to one note land on
//! the server in the order the gestures happened and the last one wins.
//!
//! ERROR HANDLING
//! ==============
//! Transient failures are retried with linear backoff (`attempt * base`).
//! When a write exhausts its attempts, or fails permanently, the worker emits
//! `SyncEvent::Failed` and moves on. Nothing is rolled back: the desk marks
//! the note unsynced, and a later successful write of the same note clears it.

#[cfg(test)]
#[path = "outbox_test.rs"]
mod outbox_test;

use std::sync::Arc;
use std::time::Duration;

use canvas::doc::{BoardId, NoteId, NotePatch};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::api::{ApiError, BoardApi};

pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

// =============================================================================
// TYPES
// =============================================================================

/// Retry policy for one write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total tries, including the first. Values below 1 are treated as 1.
    pub attempts: u32,
    pub base: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { attempts: 3, base: Duration::from_millis(200) }
    }
}

impl RetryConfig {
    /// Delay before retry number `attempt` (1-based).
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base.saturating_mul(attempt)
    }
}

/// A durable write queued behind a local change.
#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    UpdateNote { id: NoteId, fields: NotePatch },
    DeleteNote { id: NoteId },
    DeleteBoard { id: BoardId },
}

/// What a write was about, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteTarget {
    Note(NoteId),
    Board(BoardId),
}

impl Write {
    #[must_use]
    pub fn target(&self) -> WriteTarget {
        match self {
            Self::UpdateNote { id, .. } | Self::DeleteNote { id } => WriteTarget::Note(*id),
            Self::DeleteBoard { id } => WriteTarget::Board(*id),
        }
    }
}

/// Outcome of one write, reported in completion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    Synced(WriteTarget),
    Failed { target: WriteTarget, error: String },
}

#[derive(Debug, thiserror::Error)]
#[error("outbox worker has stopped")]
pub struct OutboxClosed;

enum Job {
    Write(Write),
    Flush(oneshot::Sender<()>),
}

// =============================================================================
// OUTBOX
// =============================================================================

/// Handle to the write queue. Dropping every handle stops the worker once the
/// queue is drained.
pub struct Outbox {
    jobs: mpsc::Sender<Job>,
    worker: JoinHandle<()>,
}

impl Outbox {
    /// Start the worker. Returns the queue handle and the stream of sync events.
    #[must_use]
    pub fn spawn(
        api: Arc<dyn BoardApi>,
        retry: RetryConfig,
        capacity: usize,
    ) -> (Self, mpsc::UnboundedReceiver<SyncEvent>) {
        let (jobs, rx) = mpsc::channel(capacity.max(1));
        let (events, events_rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(api, retry, rx, events));
        (Self { jobs, worker }, events_rx)
    }

    /// Queue a write. Waits only if the queue is full.
    ///
    /// # Errors
    ///
    /// `OutboxClosed` if the worker has exited.
    pub async fn enqueue(&self, write: Write) -> Result<(), OutboxClosed> {
        self.jobs.send(Job::Write(write)).await.map_err(|_| OutboxClosed)
    }

    /// Wait until every write queued before this call has finished, including
    /// retries. Its sync event has been sent by the time this returns.
    ///
    /// # Errors
    ///
    /// `OutboxClosed` if the worker has exited.
    pub async fn flush(&self) -> Result<(), OutboxClosed> {
        let (ack, done) = oneshot::channel();
        self.jobs.send(Job::Flush(ack)).await.map_err(|_| OutboxClosed)?;
        done.await.map_err(|_| OutboxClosed)
    }

    /// Close the queue and wait for the worker to drain it.
    pub async fn shutdown(self) {
        let Self { jobs, worker } = self;
        drop(jobs);
        if let Err(e) = worker.await {
            error!(error = %e, "outbox worker panicked");
        }
    }
}

// =============================================================================
// WORKER
// =============================================================================

async fn run_worker(
    api: Arc<dyn BoardApi>,
    retry: RetryConfig,
    mut jobs: mpsc::Receiver<Job>,
    events: mpsc::UnboundedSender<SyncEvent>,
) {
    while let Some(job) = jobs.recv().await {
        match job {
            Job::Flush(ack) => {
                if ack.send(()).is_err() {
                    debug!("flush waiter went away");
                }
            }
            Job::Write(write) => {
                let target = write.target();
                let event = match deliver(api.as_ref(), &retry, &write).await {
                    Ok(()) => SyncEvent::Synced(target),
                    Err(e) => {
                        error!(?target, error = %e, "write abandoned");
                        SyncEvent::Failed { target, error: e.to_string() }
                    }
                };
                if events.send(event).is_err() {
                    debug!("sync event receiver dropped");
                }
            }
        }
    }
    debug!("outbox worker stopped");
}

async fn deliver(api: &dyn BoardApi, retry: &RetryConfig, write: &Write) -> Result<(), ApiError> {
    let attempts = retry.attempts.max(1);
    let mut attempt = 1;
    loop {
        match perform(api, write).await {
            Ok(()) => return Ok(()),
            Err(e) if attempt < attempts && e.is_transient() => {
                warn!(attempt, error = %e, "write failed; retrying");
                tokio::time::sleep(retry.backoff(attempt)).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

async fn perform(api: &dyn BoardApi, write: &Write) -> Result<(), ApiError> {
    match write {
        Write::UpdateNote { id, fields } => api.update_note(*id, fields).await,
        Write::DeleteNote { id } => api.delete_note(*id).await,
        Write::DeleteBoard { id } => api.delete_board(*id).await,
    }
}

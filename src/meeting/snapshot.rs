//! Shared "current job" cell read by presentation.
//!
//! Only the submission success path and the poll handler write here. Every
//! reset bumps the generation; poll results tagged with an older generation
//! are discarded so a late response cannot resurrect a cleared session.

use tokio::sync::watch;

use super::job::{Job, JobStatus};

/// Observable state of the current session's job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub generation: u64,
    pub job: Option<Job>,
}

/// Result of applying a polled snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Merged into the current job; carries the resulting status.
    Applied(JobStatus),
    /// The session moved on since the poll was scheduled.
    Stale,
    /// The response described a different job than the one tracked.
    Mismatched,
}

/// Single-owner handle around the session snapshot.
#[derive(Clone)]
pub struct SnapshotHandle {
    inner: watch::Sender<SessionSnapshot>,
}

impl Default for SnapshotHandle {
    fn default() -> Self {
        let (inner, _) = watch::channel(SessionSnapshot::default());
        Self { inner }
    }
}

impl SnapshotHandle {
    pub fn job(&self) -> Option<Job> {
        self.inner.borrow().job.clone()
    }

    pub fn generation(&self) -> u64 {
        self.inner.borrow().generation
    }

    /// Receiver that wakes on every applied change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.subscribe()
    }

    /// Install the initial snapshot from a successful submission.
    ///
    /// Starts a new generation, returned for tagging subsequent polls.
    pub(crate) fn begin(&self, job: Job) -> u64 {
        let mut generation = 0;
        self.inner.send_modify(|state| {
            state.generation += 1;
            state.job = Some(job);
            generation = state.generation;
        });
        generation
    }

    /// Merge a polled snapshot if it still belongs to the current session.
    pub(crate) fn apply_poll(&self, generation: u64, job: Job) -> PollOutcome {
        let mut outcome = PollOutcome::Stale;
        self.inner.send_if_modified(|state| {
            if state.generation != generation {
                return false;
            }
            let Some(current) = state.job.as_mut() else {
                return false;
            };
            if current.id != job.id {
                outcome = PollOutcome::Mismatched;
                return false;
            }

            let before = current.clone();
            current.merge(job);
            outcome = PollOutcome::Applied(current.status);
            *current != before
        });
        outcome
    }

    /// Drop the tracked job and invalidate in-flight polls.
    pub(crate) fn reset(&self) {
        self.inner.send_modify(|state| {
            state.generation += 1;
            state.job = None;
        });
    }
}

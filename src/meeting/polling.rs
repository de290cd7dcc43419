//! Periodic refresh of a job snapshot until it reaches a terminal state.
//!
//! The poll loop runs as a spawned task on a fixed-period timer. At most one
//! fetch is in flight; transport, parse and timeout failures are transient
//! and only logged. The loop ends on a terminal status, on [`PollingSupervisor::stop`],
//! or when the snapshot cell reports that the session moved on.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, timeout, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::client::{MeetingsApi, DEFAULT_FETCH_TIMEOUT};
use super::job::JobStatus;
use super::snapshot::{PollOutcome, SnapshotHandle};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub fetch_timeout: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

struct ActivePoll {
    job_id: String,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

pub struct PollingSupervisor {
    api: Arc<dyn MeetingsApi>,
    snapshot: SnapshotHandle,
    settings: PollSettings,
    active: Option<ActivePoll>,
}

impl PollingSupervisor {
    pub fn new(api: Arc<dyn MeetingsApi>, snapshot: SnapshotHandle, settings: PollSettings) -> Self {
        Self {
            api,
            snapshot,
            settings,
            active: None,
        }
    }

    /// Whether a poll loop is currently running.
    pub fn is_polling(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| !active.handle.is_finished())
    }

    /// Identifier of the job currently being polled, if any.
    pub fn job_id(&self) -> Option<&str> {
        self.active
            .as_ref()
            .filter(|active| !active.handle.is_finished())
            .map(|active| active.job_id.as_str())
    }

    /// Begin polling `job_id` unless it is already being polled.
    ///
    /// A terminal status stops any running loop instead, whether it comes
    /// from `last_known` or from the snapshot already recorded for `job_id`.
    /// A different identifier replaces the running loop and restarts the timer.
    /// Must be called from within a tokio runtime.
    pub fn start_or_continue(&mut self, job_id: &str, last_known: JobStatus) {
        let status = match self.snapshot.job() {
            Some(known) if known.id == job_id && known.status.is_terminal() => known.status,
            _ => last_known,
        };
        if status.is_terminal() {
            debug!("Job {} already {}, not polling", job_id, status.as_str());
            self.stop();
            return;
        }

        if self.job_id() == Some(job_id) {
            return;
        }

        self.stop();

        let cancel = CancellationToken::new();
        let generation = self.snapshot.generation();
        let handle = tokio::spawn(run_poll_loop(
            self.api.clone(),
            self.snapshot.clone(),
            job_id.to_string(),
            generation,
            self.settings,
            cancel.clone(),
        ));

        info!(
            "Polling job {} every {}ms",
            job_id,
            self.settings.interval.as_millis()
        );

        self.active = Some(ActivePoll {
            job_id: job_id.to_string(),
            cancel,
            handle,
        });
    }

    /// Cancel the pending timer and any in-flight fetch.
    pub fn stop(&mut self) {
        if let Some(active) = self.active.take() {
            if !active.handle.is_finished() {
                debug!("Stopping poll loop for job {}", active.job_id);
            }
            active.cancel.cancel();
            active.handle.abort();
        }
    }
}

impl Drop for PollingSupervisor {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_poll_loop(
    api: Arc<dyn MeetingsApi>,
    snapshot: SnapshotHandle,
    job_id: String,
    generation: u64,
    settings: PollSettings,
    cancel: CancellationToken,
) {
    let mut ticker = interval_at(Instant::now() + settings.interval, settings.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut failures: u32 = 0;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = ticker.tick() => {}
        }

        let fetched = tokio::select! {
            _ = cancel.cancelled() => return,
            result = timeout(settings.fetch_timeout, api.fetch(&job_id)) => result,
        };

        let job = match fetched {
            Ok(Ok(job)) => job,
            Ok(Err(e)) => {
                failures += 1;
                warn!("Transient poll failure for job {} (#{}): {:#}", job_id, failures, e);
                continue;
            }
            Err(_) => {
                failures += 1;
                warn!(
                    "Poll for job {} timed out after {}s (#{})",
                    job_id,
                    settings.fetch_timeout.as_secs(),
                    failures
                );
                continue;
            }
        };

        if cancel.is_cancelled() {
            return;
        }
        failures = 0;

        match snapshot.apply_poll(generation, job) {
            PollOutcome::Applied(status) if status.is_terminal() => {
                info!("Job {} finished: {}", job_id, status.as_str());
                return;
            }
            PollOutcome::Applied(status) => {
                debug!("Job {} still {}", job_id, status.as_str());
            }
            PollOutcome::Stale => {
                debug!("Discarding poll result for job {} from a previous session", job_id);
                return;
            }
            PollOutcome::Mismatched => {
                warn!("Poll for job {} returned a different job, ignoring", job_id);
            }
        }
    }
}

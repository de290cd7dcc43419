//! Upload-and-poll session.
//!
//! Wires a [`SubmissionController`] into a [`PollingSupervisor`] through the
//! shared [`SnapshotHandle`]. Presentation reads [`MeetingSession::view`] or
//! subscribes to the snapshot; it never writes.

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tracing::info;

use super::client::MeetingsApi;
use super::error::SubmissionError;
use super::file::SelectedFile;
use super::job::{Job, JobStatus, ProcessingStep};
use super::polling::{PollSettings, PollingSupervisor};
use super::snapshot::{SessionSnapshot, SnapshotHandle};
use super::submission::SubmissionController;

/// Coarse phase of the session, as presentation needs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No file selected and no job.
    Idle,
    /// A file is selected and ready to submit.
    Ready,
    Uploading,
    Processing,
    Completed,
    Failed,
}

/// Metadata of the selected file, without the payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileSummary {
    pub file_name: String,
    pub size: u64,
}

/// Everything presentation renders from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub phase: SessionPhase,
    pub selected_file: Option<FileSummary>,
    pub error: Option<String>,
    pub job: Option<Job>,
    pub steps: Option<[ProcessingStep; 3]>,
}

pub struct MeetingSession {
    submission: SubmissionController,
    supervisor: Mutex<PollingSupervisor>,
    snapshot: SnapshotHandle,
}

impl MeetingSession {
    pub fn new(api: Arc<dyn MeetingsApi>, settings: PollSettings) -> Self {
        let snapshot = SnapshotHandle::default();
        Self {
            submission: SubmissionController::new(api.clone()),
            supervisor: Mutex::new(PollingSupervisor::new(api, snapshot.clone(), settings)),
            snapshot,
        }
    }

    fn supervisor(&self) -> MutexGuard<'_, PollingSupervisor> {
        self.supervisor
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn select_file(&self, file: SelectedFile) {
        self.submission.select_file(file);
    }

    /// Submit the selected file and start polling the created job.
    pub async fn submit(&self) -> Result<Job, SubmissionError> {
        self.submission
            .submit_then(|job| {
                self.snapshot.begin(job.clone());
                self.supervisor().start_or_continue(&job.id, job.status);
            })
            .await
    }

    /// Start a new session: drop the selection, stop polling, then forget the job.
    ///
    /// Refused (returns `false`) while an upload is in flight.
    pub fn reset(&self) -> bool {
        if !self.submission.clear() {
            return false;
        }
        self.supervisor().stop();
        self.snapshot.reset();
        info!("Session reset");
        true
    }

    /// Track an existing job without uploading, e.g. one created earlier.
    pub fn watch(&self, job: Job) {
        self.supervisor().stop();
        self.snapshot.reset();
        self.snapshot.begin(job.clone());
        self.supervisor().start_or_continue(&job.id, job.status);
    }

    /// Stop polling without forgetting the job.
    pub fn stop(&self) {
        self.supervisor().stop();
    }

    pub fn is_polling(&self) -> bool {
        self.supervisor().is_polling()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot.subscribe()
    }

    pub fn job(&self) -> Option<Job> {
        self.snapshot.job()
    }

    pub fn view(&self) -> SessionView {
        let job = self.snapshot.job();
        let selected_file = self.submission.selected_file().map(|f| FileSummary {
            file_name: f.file_name().to_string(),
            size: f.size(),
        });
        let uploading = self.submission.is_submitting();

        let phase = match (&job, uploading) {
            (_, true) => SessionPhase::Uploading,
            (Some(job), false) => match job.status {
                JobStatus::Processing => SessionPhase::Processing,
                JobStatus::Completed => SessionPhase::Completed,
                JobStatus::Failed => SessionPhase::Failed,
            },
            (None, false) if selected_file.is_some() => SessionPhase::Ready,
            (None, false) => SessionPhase::Idle,
        };

        SessionView {
            phase,
            selected_file,
            error: self.submission.error().map(|e| e.to_string()),
            steps: job.as_ref().map(Job::steps),
            job,
        }
    }
}

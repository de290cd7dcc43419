//! Pre-submission lifecycle of a single recording.
//!
//! Holds the selected file and guarantees at most one upload in flight.

use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{error, info, warn};

use super::client::MeetingsApi;
use super::error::SubmissionError;
use super::file::SelectedFile;
use super::job::{Job, JobStatus};

#[derive(Default)]
struct SubmissionState {
    selected: Option<SelectedFile>,
    // Bumped on every selection so a successful upload only discards the
    // file it actually sent.
    selection_seq: u64,
    error: Option<SubmissionError>,
    in_flight: bool,
}

pub struct SubmissionController {
    api: Arc<dyn MeetingsApi>,
    state: Mutex<SubmissionState>,
}

impl SubmissionController {
    pub fn new(api: Arc<dyn MeetingsApi>) -> Self {
        Self {
            api,
            state: Mutex::new(SubmissionState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, SubmissionState> {
        // The state has no invariants a panicking holder could break.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replace the selected file and clear any prior error.
    pub fn select_file(&self, file: SelectedFile) {
        let mut state = self.state();
        info!("Selected {} ({} bytes)", file.file_name(), file.size());
        state.selected = Some(file);
        state.selection_seq += 1;
        state.error = None;
    }

    /// Discard the selection and error. Refused while an upload is in flight.
    pub fn clear(&self) -> bool {
        let mut state = self.state();
        if state.in_flight {
            warn!("Ignoring clear while a submission is in flight");
            return false;
        }
        state.selected = None;
        state.selection_seq += 1;
        state.error = None;
        true
    }

    pub fn selected_file(&self) -> Option<SelectedFile> {
        self.state().selected.clone()
    }

    pub fn error(&self) -> Option<SubmissionError> {
        self.state().error
    }

    pub fn is_submitting(&self) -> bool {
        self.state().in_flight
    }

    /// Upload the selected file.
    ///
    /// On success the returned job always reports [`JobStatus::Processing`]
    /// so polling can begin immediately. On failure the selection is kept
    /// for a retry.
    pub async fn submit(&self) -> Result<Job, SubmissionError> {
        self.submit_then(|_| {}).await
    }

    /// Like [`submit`](Self::submit), running `on_created` with the new job
    /// before the submission stops counting as in flight.
    pub(crate) async fn submit_then<F>(&self, on_created: F) -> Result<Job, SubmissionError>
    where
        F: FnOnce(&Job),
    {
        let (file, seq) = {
            let mut state = self.state();
            if state.in_flight {
                warn!("Submission already in flight, ignoring duplicate submit");
                return Err(SubmissionError::InFlight);
            }
            let Some(file) = state.selected.clone() else {
                return Err(SubmissionError::NoFileSelected);
            };
            state.in_flight = true;
            state.error = None;
            (file, state.selection_seq)
        };

        info!("Submitting {} for processing", file.file_name());
        let result = self.api.upload(&file).await;

        match result {
            Ok(mut job) => {
                job.status = JobStatus::Processing;
                info!("Meeting job created: {}", job.id);
                // Still in flight here, so a concurrent clear is refused.
                on_created(&job);

                let mut state = self.state();
                state.in_flight = false;
                if state.selection_seq == seq {
                    state.selected = None;
                }
                Ok(job)
            }
            Err(e) => {
                error!("Meeting upload failed: {:#}", e);
                let mut state = self.state();
                state.in_flight = false;
                state.error = Some(SubmissionError::Failed);
                Err(SubmissionError::Failed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meeting::fake::{job, recording, FakeApi, Reply};
    use std::time::Duration;

    fn controller(api: &Arc<FakeApi>) -> SubmissionController {
        SubmissionController::new(api.clone())
    }

    #[tokio::test]
    async fn test_submit_without_file_is_rejected() {
        let api = Arc::new(FakeApi::new());
        let controller = controller(&api);

        assert_eq!(controller.submit().await, Err(SubmissionError::NoFileSelected));
        assert_eq!(api.uploads(), 0);
    }

    #[tokio::test]
    async fn test_submit_forces_processing_status() {
        let api = Arc::new(FakeApi::new());
        api.set_upload_reply(Reply::Job(job("abc", JobStatus::Completed)));
        let controller = controller(&api);
        controller.select_file(recording());

        let created = controller.submit().await.unwrap();
        assert_eq!(created.id, "abc");
        assert_eq!(created.status, JobStatus::Processing);
        assert!(controller.selected_file().is_none());
        assert!(!controller.is_submitting());
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_submit_issues_one_upload() {
        let api = Arc::new(FakeApi::new().with_upload_delay(Duration::from_millis(500)));
        let controller = controller(&api);
        controller.select_file(recording());

        let (first, second) = tokio::join!(controller.submit(), controller.submit());

        assert!(first.is_ok());
        assert_eq!(second, Err(SubmissionError::InFlight));
        assert_eq!(api.uploads(), 1);
    }

    #[tokio::test]
    async fn test_failure_keeps_file_and_allows_retry() {
        let api = Arc::new(FakeApi::new());
        api.set_upload_reply(Reply::Error("HTTP 500".to_string()));
        let controller = controller(&api);
        controller.select_file(recording());

        assert_eq!(controller.submit().await, Err(SubmissionError::Failed));
        assert_eq!(controller.error(), Some(SubmissionError::Failed));
        assert_eq!(
            controller.selected_file().map(|f| f.file_name().to_string()),
            Some("meeting.mp3".to_string())
        );

        api.set_upload_reply(Reply::Job(job("abc", JobStatus::Processing)));
        assert!(controller.submit().await.is_ok());
        assert_eq!(api.uploads(), 2);
        assert!(controller.error().is_none());
    }

    #[tokio::test]
    async fn test_select_file_clears_error() {
        let api = Arc::new(FakeApi::new());
        api.set_upload_reply(Reply::Error("boom".to_string()));
        let controller = controller(&api);
        controller.select_file(recording());
        let _ = controller.submit().await;
        assert!(controller.error().is_some());

        controller.select_file(SelectedFile::new("other.wav", vec![1, 2, 3]));
        assert!(controller.error().is_none());
        assert_eq!(controller.selected_file().unwrap().file_name(), "other.wav");
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_refused_while_in_flight() {
        let api = Arc::new(FakeApi::new().with_upload_delay(Duration::from_secs(1)));
        let controller = controller(&api);
        controller.select_file(recording());

        let clear_during_upload = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            controller.clear()
        };
        let (result, cleared) = tokio::join!(controller.submit(), clear_during_upload);

        assert!(result.is_ok());
        assert!(!cleared);
        assert!(controller.clear());
    }

    #[tokio::test(start_paused = true)]
    async fn test_selection_during_upload_survives_success() {
        let api = Arc::new(FakeApi::new().with_upload_delay(Duration::from_secs(1)));
        let controller = controller(&api);
        controller.select_file(recording());

        let reselect = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            controller.select_file(SelectedFile::new("next.wav", vec![0]));
        };
        let (result, _) = tokio::join!(controller.submit(), reselect);

        assert!(result.is_ok());
        assert_eq!(controller.selected_file().unwrap().file_name(), "next.wav");
    }

    #[tokio::test]
    async fn test_clear_refused_until_created_job_is_handed_off() {
        let api = Arc::new(FakeApi::new());
        let controller = controller(&api);
        controller.select_file(recording());

        let mut handed_off = None;
        let created = controller
            .submit_then(|job| {
                assert!(controller.is_submitting());
                assert!(!controller.clear());
                handed_off = Some(job.id.clone());
            })
            .await
            .unwrap();

        assert_eq!(handed_off.as_deref(), Some(created.id.as_str()));
        assert!(!controller.is_submitting());
        assert!(controller.clear());
    }
}

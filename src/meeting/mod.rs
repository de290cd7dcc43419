//! Meeting upload-and-poll engine.
//!
//! A recording is uploaded to the pipeline service, which transcribes,
//! summarizes and publishes it to an external page in the background. This
//! module tracks that job until it completes or fails.

pub mod client;
pub mod error;
pub mod file;
pub mod job;
pub mod polling;
pub mod session;
pub mod snapshot;
pub mod submission;

#[cfg(test)]
pub(crate) mod fake;

pub use client::{HttpMeetingsClient, MeetingsApi};
pub use error::SubmissionError;
pub use file::SelectedFile;
pub use job::{Job, JobStatus, ProcessingStep, StepKind, StepState};
pub use polling::{PollSettings, PollingSupervisor};
pub use session::{FileSummary, MeetingSession, SessionPhase, SessionView};
pub use snapshot::{PollOutcome, SessionSnapshot, SnapshotHandle};
pub use submission::SubmissionController;

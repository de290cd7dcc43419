use thiserror::Error;

/// Errors reported to the user by the submission flow.
///
/// Network failures, non-success statuses and malformed bodies all collapse
/// into [`SubmissionError::Failed`]; the cause is logged, not surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("no file selected")]
    NoFileSelected,
    #[error("a submission is already in progress")]
    InFlight,
    #[error("submission failed")]
    Failed,
}

impl SubmissionError {
    /// Whether this is a precondition rejection rather than a failed request.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::NoFileSelected | Self::InFlight)
    }
}

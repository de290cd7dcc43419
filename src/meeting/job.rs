//! Meeting job snapshot types.
//!
//! A [`Job`] is the client's view of one uploaded recording as reported by
//! the pipeline service. Snapshots only ever move forward: see [`Job::merge`].

use serde::{Deserialize, Serialize};

/// Wire values for the `status` field.
pub mod status {
    pub const PENDING: &str = "PENDING";
    pub const PROCESSING: &str = "PROCESSING";
    pub const COMPLETED: &str = "COMPLETED";
    pub const FAILED: &str = "FAILED";
}

/// Lifecycle status of a meeting job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Map a wire status to a lifecycle value.
    ///
    /// `PENDING`, unknown values and a missing field all count as processing.
    pub fn from_wire(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(status::COMPLETED) => Self::Completed,
            Some(status::FAILED) => Self::Failed,
            _ => Self::Processing,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => status::PROCESSING,
            Self::Completed => status::COMPLETED,
            Self::Failed => status::FAILED,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Latest known snapshot of a meeting job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Job {
    pub id: String,
    pub title: Option<String>,
    pub status: JobStatus,
    pub transcript: Option<String>,
    pub summary: Option<String>,
    #[serde(rename = "notion_page_url")]
    pub external_page_url: Option<String>,
    pub created_at: Option<String>,
}

/// Raw meeting object as returned by both the upload and fetch endpoints.
///
/// Every field except `id` may be absent or null.
#[derive(Debug, Deserialize)]
pub(crate) struct MeetingResponse {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub notion_page_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl From<MeetingResponse> for Job {
    fn from(raw: MeetingResponse) -> Self {
        Self {
            id: raw.id,
            title: non_empty(raw.title),
            status: JobStatus::from_wire(raw.status.as_deref()),
            transcript: non_empty(raw.transcript),
            summary: non_empty(raw.summary),
            external_page_url: non_empty(raw.notion_page_url),
            created_at: non_empty(raw.created_at),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Job {
    /// Parse a job from a JSON response body.
    pub fn from_json(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<MeetingResponse>(body).map(Job::from)
    }

    /// Fold a newer snapshot of the same job into this one.
    ///
    /// Terminal statuses are sticky and text fields never go from present
    /// back to absent.
    pub fn merge(&mut self, newer: Job) {
        if !self.status.is_terminal() {
            self.status = newer.status;
        }
        keep_latest(&mut self.title, newer.title);
        keep_latest(&mut self.transcript, newer.transcript);
        keep_latest(&mut self.summary, newer.summary);
        keep_latest(&mut self.external_page_url, newer.external_page_url);
        keep_latest(&mut self.created_at, newer.created_at);
    }

    /// Creation time, when the backend reported a parseable RFC 3339 value.
    pub fn created_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        let raw = self.created_at.as_deref()?;
        chrono::DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&chrono::Utc))
    }

    /// Pipeline steps with their progress, in execution order.
    pub fn steps(&self) -> [ProcessingStep; 3] {
        let processing = self.status == JobStatus::Processing;
        let transcript = self.transcript.is_some();
        let summary = self.summary.is_some();
        let page = self.external_page_url.is_some();

        [
            ProcessingStep::new(StepKind::Transcript, transcript, processing && !transcript),
            ProcessingStep::new(StepKind::Summary, summary, processing && transcript && !summary),
            ProcessingStep::new(StepKind::ExternalPage, page, processing && summary && !page),
        ]
    }
}

fn keep_latest(current: &mut Option<String>, newer: Option<String>) {
    if newer.is_some() {
        *current = newer;
    }
}

/// Stage of the server-side pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Transcript,
    Summary,
    ExternalPage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Pending,
    Current,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProcessingStep {
    pub kind: StepKind,
    pub state: StepState,
}

impl ProcessingStep {
    fn new(kind: StepKind, completed: bool, current: bool) -> Self {
        let state = if completed {
            StepState::Completed
        } else if current {
            StepState::Current
        } else {
            StepState::Pending
        };
        Self { kind, state }
    }
}

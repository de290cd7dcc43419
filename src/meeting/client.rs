//! HTTP client for the meetings pipeline API.
//!
//! Two operations: upload a recording (creating a job) and fetch the
//! latest snapshot of a job.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::debug;

use super::file::SelectedFile;
use super::job::Job;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Access to the meetings pipeline service.
#[async_trait]
pub trait MeetingsApi: Send + Sync {
    /// Upload a recording, returning the snapshot of the newly created job.
    async fn upload(&self, file: &SelectedFile) -> Result<Job>;

    /// Fetch the latest snapshot of a job.
    async fn fetch(&self, job_id: &str) -> Result<Job>;
}

/// `MeetingsApi` implementation backed by `reqwest`.
pub struct HttpMeetingsClient {
    client: reqwest::Client,
    base_url: String,
    fetch_timeout: Duration,
}

impl HttpMeetingsClient {
    /// Create a client for the service at `base_url` (scheme and host, no path).
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn upload_url(&self) -> String {
        format!("{}/api/v1/meetings/upload", self.base_url)
    }

    fn meeting_url(&self, job_id: &str) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&format!("{}/api/v1/meetings", self.base_url))
            .with_context(|| format!("Invalid meetings API URL: {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Meetings API URL cannot have a path: {}", self.base_url))?
            .push(job_id);
        Ok(url)
    }
}

#[async_trait]
impl MeetingsApi for HttpMeetingsClient {
    async fn upload(&self, file: &SelectedFile) -> Result<Job> {
        let form = Form::new().part(
            "file",
            Part::bytes(file.bytes().to_vec())
                .file_name(file.file_name().to_string())
                .mime_str(file.mime_type())?,
        );

        debug!(
            "Uploading {} ({} bytes) to {}",
            file.file_name(),
            file.size(),
            self.upload_url()
        );

        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .context("Failed to upload recording")?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(anyhow::anyhow!("Upload failed ({}): {}", status, body));
        }

        Job::from_json(&body).context("Failed to parse upload response")
    }

    async fn fetch(&self, job_id: &str) -> Result<Job> {
        let response = self
            .client
            .get(self.meeting_url(job_id)?)
            .timeout(self.fetch_timeout)
            .send()
            .await
            .context("Failed to fetch meeting")?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "Failed to fetch meeting ({}): {}",
                status,
                body
            ));
        }

        Job::from_json(&body).context("Failed to parse meeting response")
    }
}

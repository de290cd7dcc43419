//! Scripted in-memory `MeetingsApi` for unit tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::client::MeetingsApi;
use super::file::SelectedFile;
use super::job::{Job, JobStatus};

#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Job(Job),
    Error(String),
}

pub(crate) struct FakeApi {
    upload_reply: Mutex<Reply>,
    upload_delay: Duration,
    fetch_script: Mutex<VecDeque<(Duration, Reply)>>,
    last_fetch: Mutex<Option<Reply>>,
    uploads: AtomicUsize,
    fetches: AtomicUsize,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            upload_reply: Mutex::new(Reply::Job(job("abc", JobStatus::Processing))),
            upload_delay: Duration::ZERO,
            fetch_script: Mutex::new(VecDeque::new()),
            last_fetch: Mutex::new(None),
            uploads: AtomicUsize::new(0),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn with_upload_delay(mut self, delay: Duration) -> Self {
        self.upload_delay = delay;
        self
    }

    pub fn set_upload_reply(&self, reply: Reply) {
        *self.upload_reply.lock().unwrap() = reply;
    }

    /// Queue a fetch reply. Once the script runs out the last reply repeats.
    pub fn push_fetch(&self, reply: Reply) {
        self.push_fetch_delayed(Duration::ZERO, reply);
    }

    pub fn push_fetch_delayed(&self, delay: Duration, reply: Reply) {
        self.fetch_script.lock().unwrap().push_back((delay, reply));
    }

    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MeetingsApi for FakeApi {
    async fn upload(&self, _file: &SelectedFile) -> Result<Job> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.upload_delay).await;
        let reply = self.upload_reply.lock().unwrap().clone();
        match reply {
            Reply::Job(job) => Ok(job),
            Reply::Error(message) => Err(anyhow!(message)),
        }
    }

    async fn fetch(&self, _job_id: &str) -> Result<Job> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let next = self.fetch_script.lock().unwrap().pop_front();
        let reply = match next {
            Some((delay, reply)) => {
                *self.last_fetch.lock().unwrap() = Some(reply.clone());
                tokio::time::sleep(delay).await;
                reply
            }
            None => self
                .last_fetch
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| Reply::Error("no scripted reply".to_string())),
        };
        match reply {
            Reply::Job(job) => Ok(job),
            Reply::Error(message) => Err(anyhow!(message)),
        }
    }
}

pub(crate) fn job(id: &str, status: JobStatus) -> Job {
    Job {
        id: id.to_string(),
        title: None,
        status,
        transcript: None,
        summary: None,
        external_page_url: None,
        created_at: None,
    }
}

pub(crate) fn recording() -> SelectedFile {
    SelectedFile::new("meeting.mp3", b"ID3fake".to_vec())
}

//! Locally selected recording awaiting upload.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::fs;

/// MIME type for a known audio/video extension.
pub fn mime_type_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "wav" => Some("audio/wav"),
        "mp3" => Some("audio/mpeg"),
        "m4a" => Some("audio/mp4"),
        "flac" => Some("audio/flac"),
        "ogg" => Some("audio/ogg"),
        "opus" => Some("audio/opus"),
        "webm" => Some("audio/webm"),
        "mp4" => Some("video/mp4"),
        "mov" => Some("video/quicktime"),
        _ => None,
    }
}

/// A candidate recording: binary payload plus filename metadata.
///
/// Type and size are deliberately not validated here; the pipeline
/// service decides what it accepts. Cloning shares the payload.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    file_name: String,
    bytes: Arc<Vec<u8>>,
}

impl SelectedFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: Arc::new(bytes),
        }
    }

    /// Read a recording from disk.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio")
            .to_string();

        Ok(Self::new(file_name, bytes))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size in megabytes, for display.
    pub fn size_mb(&self) -> f64 {
        self.size() as f64 / (1024.0 * 1024.0)
    }

    pub fn mime_type(&self) -> &'static str {
        Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(mime_type_for_extension)
            .unwrap_or("application/octet-stream")
    }
}

//! User-facing messages in the supported locales.

use crate::meeting::{JobStatus, StepKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Ko,
}

impl Locale {
    /// Parse a locale tag such as `ko`, `ko-KR` or `en_US`. Unknown tags fall back to English.
    pub fn parse(tag: &str) -> Self {
        let language = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match language.as_str() {
            "ko" => Self::Ko,
            _ => Self::En,
        }
    }

    pub fn messages(self) -> &'static Messages {
        match self {
            Self::En => &EN,
            Self::Ko => &KO,
        }
    }
}

pub struct Messages {
    pub progress_heading: &'static str,
    pub uploading: &'static str,
    pub working: &'static str,
    pub upload_failed: &'static str,
    pub pipeline_failed: &'static str,
    pub interrupted: &'static str,
    pub result_title: &'static str,
    pub result_body: &'static str,
    pub open_page: &'static str,
    pub no_page: &'static str,
    pub new_session_hint: &'static str,
    step_transcript: &'static str,
    step_summary: &'static str,
    step_page: &'static str,
    badge_processing: &'static str,
    badge_completed: &'static str,
    badge_failed: &'static str,
}

impl Messages {
    pub fn step_label(&self, kind: StepKind) -> &'static str {
        match kind {
            StepKind::Transcript => self.step_transcript,
            StepKind::Summary => self.step_summary,
            StepKind::ExternalPage => self.step_page,
        }
    }

    pub fn badge(&self, status: JobStatus) -> &'static str {
        match status {
            JobStatus::Processing => self.badge_processing,
            JobStatus::Completed => self.badge_completed,
            JobStatus::Failed => self.badge_failed,
        }
    }
}

static EN: Messages = Messages {
    progress_heading: "Progress",
    uploading: "Uploading...",
    working: "Working...",
    upload_failed: "Upload failed. Please try again.",
    pipeline_failed: "Processing failed.",
    interrupted: "Stopped watching. The meeting keeps processing on the server.",
    result_title: "Meeting summary ready",
    result_body: "All processing is done. Open the generated Notion page:",
    no_page: "Processing finished, but no Notion page was created.",
    open_page: "Open in Notion",
    new_session_hint: "Run `notesync upload <FILE>` to record another meeting.",
    step_transcript: "Speech to text",
    step_summary: "AI summary",
    step_page: "Notion page",
    badge_processing: "Processing...",
    badge_completed: "Completed",
    badge_failed: "Failed",
};

static KO: Messages = Messages {
    progress_heading: "처리 진행상황",
    uploading: "처리 중...",
    working: "작업 진행 중...",
    upload_failed: "업로드에 실패했습니다. 다시 시도해주세요.",
    pipeline_failed: "처리에 실패했습니다.",
    interrupted: "진행상황 확인을 중단했습니다. 서버에서는 계속 처리됩니다.",
    result_title: "회의 요약 완료",
    result_body: "모든 처리가 완료되었습니다. 생성된 Notion 페이지를 확인하세요:",
    no_page: "처리가 완료되었지만 Notion 페이지가 생성되지 않았습니다.",
    open_page: "Notion에서 열기",
    new_session_hint: "다른 회의 기록하기: `notesync upload <FILE>`",
    step_transcript: "음성 텍스트 변환",
    step_summary: "AI 요약 생성",
    step_page: "Notion 페이지 작성",
    badge_processing: "처리 중...",
    badge_completed: "완료됨",
    badge_failed: "실패",
};

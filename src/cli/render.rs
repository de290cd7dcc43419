//! Plain-text rendering of job snapshots.

use crate::meeting::{Job, ProcessingStep, StepKind, StepState};

use super::messages::Messages;

pub fn step_line(messages: &Messages, step: &ProcessingStep) -> String {
    let label = messages.step_label(step.kind);
    match step.state {
        StepState::Completed => format!("[✓] {}", label),
        StepState::Current => format!("[…] {} ({})", label, messages.working),
        StepState::Pending => format!("[ ] {}", label),
    }
}

/// Heading with status badge followed by the step list.
pub fn render_progress(messages: &Messages, job: &Job) -> String {
    let mut lines = vec![format!(
        "{} [{}]",
        messages.progress_heading,
        messages.badge(job.status)
    )];
    lines.extend(job.steps().iter().map(|step| format!("  {}", step_line(messages, step))));
    lines.join("\n")
}

/// Spinner message for an in-progress job: the current step, or the badge.
pub fn spinner_message(messages: &Messages, job: &Job) -> String {
    job.steps()
        .iter()
        .find(|step| step.state == StepState::Current)
        .map(|step| format!("{} ({})", messages.step_label(step.kind), messages.working))
        .unwrap_or_else(|| messages.badge(job.status).to_string())
}

fn created_at_line(job: &Job) -> Option<String> {
    job.created_at()
        .map(|dt| {
            dt.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .or_else(|| job.created_at.clone())
}

/// Summary card shown once a job completes.
pub fn render_result_card(messages: &Messages, job: &Job) -> String {
    let mut lines = vec![job
        .title
        .clone()
        .unwrap_or_else(|| messages.result_title.to_string())];

    if let Some(created) = created_at_line(job) {
        lines.push(created);
    }
    lines.push(String::new());

    match &job.external_page_url {
        Some(url) => {
            lines.push(messages.result_body.to_string());
            lines.push(format!("{}: {}", messages.open_page, url));
        }
        None => lines.push(messages.no_page.to_string()),
    }

    lines.push(String::new());
    lines.push(messages.new_session_hint.to_string());
    lines.join("\n")
}

/// Full snapshot including transcript and summary text.
pub fn render_details(messages: &Messages, job: &Job) -> String {
    let mut out = format!("Meeting {}", job.id);
    if let Some(title) = &job.title {
        out.push_str(&format!(": {}", title));
    }
    if let Some(created) = created_at_line(job) {
        out.push_str(&format!("\nCreated: {}", created));
    }
    out.push_str(&format!("\n{}", render_progress(messages, job)));

    if let Some(url) = &job.external_page_url {
        out.push_str(&format!("\n\n{}: {}", messages.open_page, url));
    }
    if let Some(summary) = &job.summary {
        out.push_str(&format!(
            "\n\n--- {} ---\n{}",
            messages.step_label(StepKind::Summary),
            summary
        ));
    }
    if let Some(transcript) = &job.transcript {
        out.push_str(&format!(
            "\n\n--- {} ---\n{}",
            messages.step_label(StepKind::Transcript),
            transcript
        ));
    }
    out
}

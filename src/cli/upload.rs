//! CLI handler for uploading a recording and following its processing.

use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::cli::args::UploadCliArgs;
use crate::cli::messages::Messages;
use crate::cli::render::{render_progress, render_result_card, spinner_message};
use crate::cli::CommandContext;
use crate::meeting::{Job, JobStatus, MeetingSession, SelectedFile, StepState};

/// Handle the upload CLI command.
pub async fn handle_upload_command(args: UploadCliArgs) -> Result<()> {
    let file = SelectedFile::from_path(&args.file).await?;

    let ctx = CommandContext::resolve(&args.connection)?;
    let messages = ctx.locale.messages();
    eprintln!("{} ({:.2} MB)", file.file_name(), file.size_mb());

    let session = MeetingSession::new(ctx.api.clone(), ctx.settings);
    session.select_file(file);

    let pb = (!args.no_progress).then(create_spinner);
    match &pb {
        Some(pb) => pb.set_message(messages.uploading),
        None => eprintln!("{}", messages.uploading),
    }

    if let Err(e) = session.submit().await {
        if let Some(pb) = &pb {
            pb.finish_and_clear();
        }
        if e.is_rejection() {
            return Err(anyhow!(e));
        }
        return Err(anyhow!(e)).context(messages.upload_failed);
    }

    let job = follow(&session, messages, pb.as_ref()).await?;
    print_outcome(&job, messages, args.json)
}

/// Create a spinner for the processing phase.
pub(crate) fn create_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Render snapshot changes until the job reaches a terminal state.
///
/// Ctrl-C stops polling; the job keeps running server-side.
pub(crate) async fn follow(
    session: &MeetingSession,
    messages: &Messages,
    pb: Option<&ProgressBar>,
) -> Result<Job> {
    let mut rx = session.subscribe();
    let mut reported = [false; 3];

    loop {
        let job = rx.borrow_and_update().job.clone();
        if let Some(job) = job {
            report_steps(&job, messages, pb, &mut reported);
            if job.status.is_terminal() {
                if let Some(pb) = pb {
                    pb.finish_and_clear();
                }
                return Ok(job);
            }
        }

        tokio::select! {
            changed = rx.changed() => changed.context("Meeting session closed")?,
            _ = tokio::signal::ctrl_c() => {
                session.stop();
                if let Some(pb) = pb {
                    pb.abandon();
                }
                return Err(anyhow!(messages.interrupted));
            }
        }
    }
}

fn report_steps(job: &Job, messages: &Messages, pb: Option<&ProgressBar>, reported: &mut [bool; 3]) {
    for (step, seen) in job.steps().iter().zip(reported.iter_mut()) {
        if step.state == StepState::Completed && !*seen {
            *seen = true;
            let line = format!("✓ {}", messages.step_label(step.kind));
            match pb {
                Some(pb) => pb.println(line),
                None => eprintln!("{}", line),
            }
        }
    }

    if let Some(pb) = pb {
        pb.set_message(spinner_message(messages, job));
    }
}

pub(crate) fn print_outcome(job: &Job, messages: &Messages, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(job)?);
    }

    match job.status {
        JobStatus::Completed => {
            if !json {
                println!("{}", render_result_card(messages, job));
            }
            Ok(())
        }
        JobStatus::Failed => {
            eprintln!("{}", render_progress(messages, job));
            Err(anyhow!(messages.pipeline_failed))
        }
        JobStatus::Processing => {
            if !json {
                println!("{}", render_progress(messages, job));
            }
            Ok(())
        }
    }
}

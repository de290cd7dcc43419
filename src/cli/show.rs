//! CLI handlers for inspecting meetings that already exist.

use anyhow::{Context, Result};

use crate::cli::args::{ShowCliArgs, WatchCliArgs};
use crate::cli::render::render_details;
use crate::cli::upload::{create_spinner, follow, print_outcome};
use crate::cli::CommandContext;
use crate::meeting::{MeetingSession, MeetingsApi};

pub async fn handle_show_command(args: ShowCliArgs) -> Result<()> {
    let ctx = CommandContext::resolve(&args.connection)?;

    let job = ctx
        .api
        .fetch(&args.id)
        .await
        .with_context(|| format!("Failed to load meeting {}", args.id))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&job)?);
    } else {
        println!("{}", render_details(ctx.locale.messages(), &job));
    }

    Ok(())
}

pub async fn handle_watch_command(args: WatchCliArgs) -> Result<()> {
    let ctx = CommandContext::resolve(&args.connection)?;
    let messages = ctx.locale.messages();

    let job = ctx
        .api
        .fetch(&args.id)
        .await
        .with_context(|| format!("Failed to load meeting {}", args.id))?;

    if job.status.is_terminal() {
        return print_outcome(&job, messages, args.json);
    }

    let session = MeetingSession::new(ctx.api.clone(), ctx.settings);
    let pb = (!args.no_progress).then(create_spinner);
    session.watch(job);

    let job = follow(&session, messages, pb.as_ref()).await?;
    print_outcome(&job, messages, args.json)
}

use anyhow::Result;
use clap::Parser;
use notesync::cli::{
    handle_show_command, handle_upload_command, handle_watch_command, Cli, CliCommand,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        CliCommand::Version => {
            println!("notesync {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        CliCommand::Upload(args) => handle_upload_command(args).await,
        CliCommand::Show(args) => handle_show_command(args).await,
        CliCommand::Watch(args) => handle_watch_command(args).await,
    }
}

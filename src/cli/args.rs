use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "notesync")]
#[command(about = "Turn meeting recordings into summarized Notion pages", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Upload a recording and follow its processing until done
    Upload(UploadCliArgs),
    /// Show the current state of a meeting
    Show(ShowCliArgs),
    /// Follow an existing meeting until processing finishes
    Watch(WatchCliArgs),
    /// Print version information
    Version,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Pipeline service URL (overrides config)
    #[arg(long)]
    pub api_url: Option<String>,
    /// Language for messages: en or ko (overrides config)
    #[arg(long)]
    pub locale: Option<String>,
}

#[derive(ClapArgs, Debug)]
pub struct UploadCliArgs {
    /// Recording to upload
    pub file: PathBuf,
    /// Disable the progress spinner
    #[arg(long)]
    pub no_progress: bool,
    /// Print the final meeting snapshot as JSON
    #[arg(long)]
    pub json: bool,
    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(ClapArgs, Debug)]
pub struct ShowCliArgs {
    /// Meeting ID
    pub id: String,
    /// Print the snapshot as JSON
    #[arg(long)]
    pub json: bool,
    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(ClapArgs, Debug)]
pub struct WatchCliArgs {
    /// Meeting ID
    pub id: String,
    /// Disable the progress spinner
    #[arg(long)]
    pub no_progress: bool,
    /// Print the final meeting snapshot as JSON
    #[arg(long)]
    pub json: bool,
    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_upload() {
        let cli = Cli::try_parse_from([
            "notesync",
            "upload",
            "meeting.mp3",
            "--api-url",
            "http://localhost:9000",
            "--no-progress",
        ])
        .unwrap();

        match cli.command {
            CliCommand::Upload(args) => {
                assert_eq!(args.file, PathBuf::from("meeting.mp3"));
                assert!(args.no_progress);
                assert!(!args.json);
                assert_eq!(
                    args.connection.api_url.as_deref(),
                    Some("http://localhost:9000")
                );
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_show_with_locale() {
        let cli = Cli::try_parse_from(["notesync", "-v", "show", "abc", "--locale", "ko", "--json"])
            .unwrap();
        assert!(cli.verbose);
        match cli.command {
            CliCommand::Show(args) => {
                assert_eq!(args.id, "abc");
                assert!(args.json);
                assert_eq!(args.connection.locale.as_deref(), Some("ko"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_upload_requires_file() {
        assert!(Cli::try_parse_from(["notesync", "upload"]).is_err());
    }
}

use crate::config::Config;
use crate::meeting::{HttpMeetingsClient, PollSettings};
use anyhow::Result;
use std::sync::Arc;

pub mod args;
pub mod messages;
pub mod render;
pub mod show;
pub mod upload;

pub use args::{Cli, CliCommand, ConnectionArgs, ShowCliArgs, UploadCliArgs, WatchCliArgs};
pub use messages::Locale;
pub use show::{handle_show_command, handle_watch_command};
pub use upload::handle_upload_command;

/// Settings shared by every command that talks to the pipeline service.
pub(crate) struct CommandContext {
    pub api: Arc<HttpMeetingsClient>,
    pub settings: PollSettings,
    pub locale: Locale,
}

impl CommandContext {
    pub fn resolve(connection: &ConnectionArgs) -> Result<Self> {
        let config = Config::load()?;
        Ok(Self::from_config(&config, connection))
    }

    fn from_config(config: &Config, connection: &ConnectionArgs) -> Self {
        let base_url = connection
            .api_url
            .as_deref()
            .unwrap_or(&config.api.base_url);
        let settings = config.api.poll_settings();
        let locale = Locale::parse(connection.locale.as_deref().unwrap_or(&config.ui.locale));

        Self {
            api: Arc::new(HttpMeetingsClient::new(base_url).with_fetch_timeout(settings.fetch_timeout)),
            settings,
            locale,
        }
    }
}

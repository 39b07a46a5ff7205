use clap::Parser;
use skybanner_core::{Config, pipeline, provider, publisher};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "skybanner",
    version,
    about = "Set a chat server banner from the current weather"
)]
pub struct Cli {
    /// Place to obtain weather information for: a text query or a
    /// WhereOnEarth id.
    #[arg(long)]
    pub location: String,

    /// Discord server id whose banner should be updated. Omit to only
    /// resolve the banner image.
    #[arg(long)]
    pub server: Option<u64>,

    /// Banner image used when the reported condition has no mapping.
    #[arg(long)]
    pub default_banner: Option<String>,

    /// If set, do everything except the banner upload.
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;
        let provider = provider::provider_from_config(&config);

        let opts = pipeline::RunOptions {
            location: self.location,
            default_banner: self.default_banner,
            dry_run: self.dry_run,
        };

        // The chat client (and with it the bot credential) only comes
        // into play when a server was named.
        let banner = match self.server {
            Some(guild_id) => {
                let client = publisher::client_from_config(&config)?;
                let target = pipeline::PublishTarget { client: client.as_ref(), guild_id };
                pipeline::run(&config, provider.as_ref(), Some(target), &opts).await?
            }
            None => pipeline::run(&config, provider.as_ref(), None, &opts).await?,
        };

        println!("{}", banner.display());
        Ok(())
    }
}

use std::path::PathBuf;
use tracing::{info, warn};

use crate::{
    Config,
    assets::banner_asset,
    error::Error,
    provider::{WeatherProvider, resolve},
    publisher::{ChatClient, PublishOutcome, publish},
};

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Free-text place name or a canonical WhereOnEarth id.
    pub location: String,

    /// Banner used when the reported condition is outside the known
    /// set; overrides the configured fallback.
    pub default_banner: Option<String>,

    /// Run every step except the banner upload itself.
    pub dry_run: bool,
}

/// Where the resolved banner should be published. Without a target the
/// run stops after resolving the image path.
#[derive(Debug)]
pub struct PublishTarget<'a> {
    pub client: &'a dyn ChatClient,
    pub guild_id: u64,
}

/// One full run: resolve the location, fetch current conditions, map
/// them to a banner image, and publish it when a target was given.
///
/// Returns the resolved image path either way. Failures in any stage
/// propagate unmodified; a [`PublishOutcome::Denied`] guild is logged
/// and does not fail the run.
pub async fn run(
    config: &Config,
    provider: &dyn WeatherProvider,
    target: Option<PublishTarget<'_>>,
    opts: &RunOptions,
) -> crate::Result<PathBuf> {
    let woeid = resolve(provider, &opts.location).await?;
    let report = provider.current_report(woeid).await?;
    info!(
        location = %report.location,
        condition = %report.state_name,
        abbr = %report.state_abbr,
        date = %report.applicable_date,
        "current weather"
    );

    let assets_dir =
        config.assets_dir().map_err(|e| Error::Configuration(e.to_string()))?;
    let fallback = opts.default_banner.as_deref().or(config.assets.fallback.as_deref());
    let banner = banner_asset(&assets_dir, &report.state_abbr, fallback)?;

    if let Some(target) = target {
        match publish(target.client, target.guild_id, &banner, opts.dry_run).await? {
            PublishOutcome::Published => info!(guild = target.guild_id, "banner updated"),
            PublishOutcome::DryRun => {
                info!(guild = target.guild_id, "dry run complete; banner unchanged");
            }
            PublishOutcome::Denied => {
                warn!(guild = target.guild_id, "guild lacks the banner feature; nothing changed");
            }
        }
    }

    Ok(banner)
}

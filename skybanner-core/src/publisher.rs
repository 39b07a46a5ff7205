use async_trait::async_trait;
use serde::Deserialize;
use std::{fmt::Debug, fs, path::Path};
use tracing::{info, warn};

use crate::{Config, config::bot_token_from_env, error::Error, publisher::discord::DiscordClient};

pub mod discord;

/// Feature flag a guild must advertise before its banner can be changed.
pub const BANNER_FEATURE: &str = "BANNER";

/// The bot account a session is authenticated as.
#[derive(Debug, Clone, Deserialize)]
pub struct BotIdentity {
    pub id: String,
    pub username: String,
}

/// Guild metadata as the chat platform reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct Guild {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub features: Vec<String>,
}

impl Guild {
    pub fn supports_banner(&self) -> bool {
        self.features.iter().any(|f| f == BANNER_FEATURE)
    }
}

/// Terminal state of one publish attempt. `Denied` is a clean exit,
/// not an error: the guild simply cannot carry a custom banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Published,
    DryRun,
    Denied,
}

/// One-shot session with the chat platform: authenticate, look up a
/// guild, replace its banner, log out.
#[async_trait]
pub trait ChatClient: Send + Sync + Debug {
    /// Verify the credential and return who the bot is logged on as.
    async fn identify(&self) -> crate::Result<BotIdentity>;

    /// Fetch a guild by id. `None` means the bot cannot see it.
    async fn guild(&self, guild_id: u64) -> crate::Result<Option<Guild>>;

    /// Replace the guild banner with the given image bytes.
    async fn set_banner(&self, guild_id: u64, image: &[u8]) -> crate::Result<()>;

    /// Release the session.
    async fn logout(&self) -> crate::Result<()>;
}

/// Construct the chat client from config, with the credential taken
/// from the environment.
pub fn client_from_config(config: &Config) -> crate::Result<Box<dyn ChatClient>> {
    let token = bot_token_from_env()?;
    Ok(Box::new(DiscordClient::new(config.discord.api_base.clone(), token)))
}

/// Replace the banner of `guild_id` with the image at `banner`.
///
/// Linear, no retries: authenticate, look up the guild, check the
/// banner capability, upload. With `dry_run` every step up to and
/// including the asset read still runs; only the upload itself is
/// skipped. Once the handshake has succeeded the session is logged out
/// on every exit path; a logout failure is logged and never replaces
/// the in-flight result.
pub async fn publish(
    client: &dyn ChatClient,
    guild_id: u64,
    banner: &Path,
    dry_run: bool,
) -> crate::Result<PublishOutcome> {
    let identity = client.identify().await?;
    info!(user = %identity.username, "logged on to chat platform");

    let outcome = upload_banner(client, guild_id, banner, dry_run).await;

    if let Err(err) = client.logout().await {
        warn!(error = %err, "failed to close chat session cleanly");
    }

    outcome
}

async fn upload_banner(
    client: &dyn ChatClient,
    guild_id: u64,
    banner: &Path,
    dry_run: bool,
) -> crate::Result<PublishOutcome> {
    let guild = client.guild(guild_id).await?.ok_or(Error::GuildNotFound { guild_id })?;

    if !guild.supports_banner() {
        warn!(guild = %guild.name, "guild does not allow custom banners; nothing uploaded");
        return Ok(PublishOutcome::Denied);
    }

    info!(banner = %banner.display(), guild = %guild.name, "uploading banner");

    let image = fs::read(banner)
        .map_err(|source| Error::AssetRead { path: banner.to_path_buf(), source })?;

    if dry_run {
        info!("dry run: banner upload skipped");
        return Ok(PublishOutcome::DryRun);
    }

    client.set_banner(guild_id, &image).await?;
    Ok(PublishOutcome::Published)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{path::PathBuf, sync::Mutex};

    #[derive(Debug, Default)]
    struct RecordingClient {
        guild: Option<Guild>,
        fail_identify: bool,
        fail_upload: bool,
        calls: Mutex<Vec<&'static str>>,
        uploaded: Mutex<Option<Vec<u8>>>,
    }

    impl RecordingClient {
        fn with_guild(features: &[&str]) -> Self {
            Self {
                guild: Some(Guild {
                    id: "4".to_string(),
                    name: "test guild".to_string(),
                    features: features.iter().map(|f| (*f).to_string()).collect(),
                }),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().expect("calls lock").clone()
        }
    }

    #[async_trait]
    impl ChatClient for RecordingClient {
        async fn identify(&self) -> crate::Result<BotIdentity> {
            self.calls.lock().expect("calls lock").push("identify");
            if self.fail_identify {
                return Err(Error::Auth { detail: "bad token".to_string() });
            }
            Ok(BotIdentity { id: "1".to_string(), username: "weatherbot".to_string() })
        }

        async fn guild(&self, _guild_id: u64) -> crate::Result<Option<Guild>> {
            self.calls.lock().expect("calls lock").push("guild");
            Ok(self.guild.clone())
        }

        async fn set_banner(&self, _guild_id: u64, image: &[u8]) -> crate::Result<()> {
            self.calls.lock().expect("calls lock").push("set_banner");
            if self.fail_upload {
                return Err(Error::Upstream {
                    url: "guilds/4".to_string(),
                    reason: "status 500".to_string(),
                });
            }
            *self.uploaded.lock().expect("uploaded lock") = Some(image.to_vec());
            Ok(())
        }

        async fn logout(&self) -> crate::Result<()> {
            self.calls.lock().expect("calls lock").push("logout");
            Ok(())
        }
    }

    fn banner_file(dir: &tempfile::TempDir, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join("snow.png");
        fs::write(&path, bytes).expect("write banner fixture");
        path
    }

    #[tokio::test]
    async fn uploads_the_asset_bytes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let banner = banner_file(&dir, b"png-bytes");
        let client = RecordingClient::with_guild(&[BANNER_FEATURE]);

        let outcome = publish(&client, 4, &banner, false).await.expect("publish must succeed");

        assert_eq!(outcome, PublishOutcome::Published);
        assert_eq!(client.calls(), vec!["identify", "guild", "set_banner", "logout"]);
        assert_eq!(client.uploaded.lock().expect("uploaded lock").as_deref(), Some(&b"png-bytes"[..]));
    }

    #[tokio::test]
    async fn guild_without_banner_feature_is_denied_not_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let banner = banner_file(&dir, b"png-bytes");
        let client = RecordingClient::with_guild(&["COMMUNITY"]);

        let outcome = publish(&client, 4, &banner, false).await.expect("denied is a clean exit");

        assert_eq!(outcome, PublishOutcome::Denied);
        assert_eq!(client.calls(), vec!["identify", "guild", "logout"]);
    }

    #[tokio::test]
    async fn dry_run_skips_only_the_upload() {
        let dir = tempfile::tempdir().expect("tempdir");
        let banner = banner_file(&dir, b"png-bytes");
        let client = RecordingClient::with_guild(&[BANNER_FEATURE]);

        let outcome = publish(&client, 4, &banner, true).await.expect("dry run must succeed");

        assert_eq!(outcome, PublishOutcome::DryRun);
        assert_eq!(client.calls(), vec!["identify", "guild", "logout"]);
    }

    #[tokio::test]
    async fn invisible_guild_is_not_found_and_still_logs_out() {
        let dir = tempfile::tempdir().expect("tempdir");
        let banner = banner_file(&dir, b"png-bytes");
        let client = RecordingClient::default();

        let err = publish(&client, 4, &banner, false).await.unwrap_err();

        assert!(matches!(err, Error::GuildNotFound { guild_id: 4 }));
        assert_eq!(client.calls(), vec!["identify", "guild", "logout"]);
    }

    #[tokio::test]
    async fn unreadable_asset_still_logs_out() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("missing.png");
        let client = RecordingClient::with_guild(&[BANNER_FEATURE]);

        let err = publish(&client, 4, &missing, false).await.unwrap_err();

        assert!(matches!(err, Error::AssetRead { .. }));
        assert_eq!(client.calls(), vec!["identify", "guild", "logout"]);
    }

    #[tokio::test]
    async fn failed_upload_still_logs_out() {
        let dir = tempfile::tempdir().expect("tempdir");
        let banner = banner_file(&dir, b"png-bytes");
        let client = RecordingClient {
            fail_upload: true,
            ..RecordingClient::with_guild(&[BANNER_FEATURE])
        };

        let err = publish(&client, 4, &banner, false).await.unwrap_err();

        assert!(matches!(err, Error::Upstream { .. }));
        assert_eq!(client.calls(), vec!["identify", "guild", "set_banner", "logout"]);
    }

    #[tokio::test]
    async fn failed_handshake_never_opened_a_session() {
        let dir = tempfile::tempdir().expect("tempdir");
        let banner = banner_file(&dir, b"png-bytes");
        let client = RecordingClient { fail_identify: true, ..RecordingClient::default() };

        let err = publish(&client, 4, &banner, false).await.unwrap_err();

        assert!(matches!(err, Error::Auth { .. }));
        assert_eq!(client.calls(), vec!["identify"]);
    }
}

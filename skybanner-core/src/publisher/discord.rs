use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::{Client, StatusCode};
use serde_json::json;
use tracing::debug;

use crate::error::Error;

use super::{BotIdentity, ChatClient, Guild};

/// Bot-authenticated client for the Discord REST API.
///
/// The platform's gateway/event model is deliberately not used here: a
/// one-shot banner update only needs request/response calls.
#[derive(Debug, Clone)]
pub struct DiscordClient {
    api_base: String,
    token: String,
    http: Client,
}

impl DiscordClient {
    pub fn new(api_base: String, token: String) -> Self {
        Self { api_base, token, http: Client::new() }
    }

    fn auth_header(&self) -> String {
        format!("Bot {}", self.token)
    }
}

#[async_trait]
impl ChatClient for DiscordClient {
    async fn identify(&self) -> crate::Result<BotIdentity> {
        let url = format!("{}/users/@me", self.api_base);

        let res = self
            .http
            .get(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await
            .map_err(|e| Error::Upstream { url: url.clone(), reason: e.to_string() })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| Error::Upstream { url: url.clone(), reason: e.to_string() })?;

        if !status.is_success() {
            return Err(Error::Auth {
                detail: format!("status {}: {}", status, truncate_body(&body)),
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| Error::MalformedResponse { url, detail: e.to_string() })
    }

    async fn guild(&self, guild_id: u64) -> crate::Result<Option<Guild>> {
        let url = format!("{}/guilds/{}", self.api_base, guild_id);

        let res = self
            .http
            .get(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await
            .map_err(|e| Error::Upstream { url: url.clone(), reason: e.to_string() })?;

        let status = res.status();

        // The platform answers 404 for an unknown id and 403 when the
        // bot is not a member; both mean "no visibility".
        if status == StatusCode::NOT_FOUND || status == StatusCode::FORBIDDEN {
            return Ok(None);
        }

        let body = res
            .text()
            .await
            .map_err(|e| Error::Upstream { url: url.clone(), reason: e.to_string() })?;

        if !status.is_success() {
            return Err(Error::Upstream {
                url,
                reason: format!("status {}: {}", status, truncate_body(&body)),
            });
        }

        let guild: Guild = serde_json::from_str(&body)
            .map_err(|e| Error::MalformedResponse { url, detail: e.to_string() })?;

        Ok(Some(guild))
    }

    async fn set_banner(&self, guild_id: u64, image: &[u8]) -> crate::Result<()> {
        let url = format!("{}/guilds/{}", self.api_base, guild_id);
        let payload = json!({ "banner": image_data_uri(image) });

        let res = self
            .http
            .patch(&url)
            .header("Authorization", self.auth_header())
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::Upstream { url: url.clone(), reason: e.to_string() })?;

        let status = res.status();
        if !status.is_success() {
            let body = res
                .text()
                .await
                .map_err(|e| Error::Upstream { url: url.clone(), reason: e.to_string() })?;
            return Err(Error::Upstream {
                url,
                reason: format!("status {}: {}", status, truncate_body(&body)),
            });
        }

        Ok(())
    }

    async fn logout(&self) -> crate::Result<()> {
        // A bot REST session holds no server-side connection; closing
        // it is a local act.
        debug!("chat session closed");
        Ok(())
    }
}

/// Image payloads go over the wire as `data:` URIs.
fn image_data_uri(image: &[u8]) -> String {
    format!("data:{};base64,{}", image_mime(image), STANDARD.encode(image))
}

fn image_mime(image: &[u8]) -> &'static str {
    if image.starts_with(b"\xFF\xD8\xFF") {
        "image/jpeg"
    } else if image.starts_with(b"GIF8") {
        "image/gif"
    } else {
        "image/png"
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX { format!("{}...", &body[..MAX]) } else { body.to_string() }
}

use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failure taxonomy shared by every pipeline stage.
///
/// Errors propagate to the caller unmodified; there is no retry or
/// partial-success handling anywhere in the crate. A guild that lacks
/// the banner capability is not an error at all — see
/// [`crate::publisher::PublishOutcome::Denied`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The remote service returned a non-2xx status or the request
    /// never completed.
    #[error("request to {url} failed: {reason}")]
    Upstream { url: String, reason: String },

    /// The location search matched nothing.
    #[error("no location found for query '{query}'")]
    LocationNotFound { query: String },

    /// The bot has no visibility into the requested guild.
    #[error("guild {guild_id} is unknown or not visible to this bot")]
    GuildNotFound { guild_id: u64 },

    /// The remote payload parsed as JSON but is missing the fields the
    /// pipeline needs.
    #[error("malformed response from {url}: {detail}")]
    MalformedResponse { url: String, detail: String },

    /// Missing credential, missing fallback image, unusable config file.
    #[error("{0}")]
    Configuration(String),

    /// The chat platform rejected the bot credential.
    #[error("chat platform handshake failed: {detail}")]
    Auth { detail: String },

    /// The resolved banner image could not be read from disk.
    #[error("could not read banner image {}: {source}", path.display())]
    AssetRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

//! Core library for the `skybanner` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather provider abstraction and its MetaWeather client
//! - The chat-platform abstraction and its Discord client
//! - The condition-to-banner mapping and the one-shot pipeline
//!
//! It is used by `skybanner-cli`, but can also be reused by other binaries or services.

pub mod assets;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod publisher;

pub use assets::banner_asset;
pub use config::{BOT_TOKEN_VAR, Config, bot_token_from_env};
pub use error::{Error, Result};
pub use model::{ConditionCode, LocationHit, WeatherReport};
pub use pipeline::{PublishTarget, RunOptions, run};
pub use provider::{WeatherProvider, provider_from_config, resolve};
pub use publisher::{ChatClient, Guild, PublishOutcome, client_from_config, publish};

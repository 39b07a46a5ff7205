use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

use crate::error::Error;

/// Environment variable holding the chat-platform bot credential.
pub const BOT_TOKEN_VAR: &str = "DISCORD_BOT_TOKEN";

/// Weather provider endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL of the MetaWeather-compatible API.
    #[serde(default = "default_weather_api_base")]
    pub api_base: String,
}

/// Chat platform endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    #[serde(default = "default_discord_api_base")]
    pub api_base: String,
}

/// Where banner images live and what to fall back to.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AssetConfig {
    /// Directory holding one image per condition code. Defaults to the
    /// platform data dir when unset.
    pub dir: Option<PathBuf>,

    /// Image file used when the provider reports a condition outside
    /// the known set. No fallback means unknown conditions fail.
    pub fallback: Option<String>,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [assets]
/// dir = "/srv/skybanner/banners"
/// fallback = "plain.png"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub weather: WeatherConfig,

    #[serde(default)]
    pub discord: DiscordConfig,

    #[serde(default)]
    pub assets: AssetConfig,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self { api_base: default_weather_api_base() }
    }
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self { api_base: default_discord_api_base() }
    }
}

fn default_weather_api_base() -> String {
    "https://www.metaweather.com/api".to_string()
}

fn default_discord_api_base() -> String {
    "https://discord.com/api/v10".to_string()
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, everything defaulted.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Directory holding the banner images: the configured one, or the
    /// platform data dir.
    pub fn assets_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.assets.dir {
            return Ok(dir.clone());
        }

        let dirs = project_dirs()?;
        Ok(dirs.data_dir().join("banners"))
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "skybanner", "skybanner-cli")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}

/// Read the bot credential from the environment.
pub fn bot_token_from_env() -> crate::Result<String> {
    bot_token_from(env::var(BOT_TOKEN_VAR).ok())
}

fn bot_token_from(value: Option<String>) -> crate::Result<String> {
    match value {
        Some(token) if !token.trim().is_empty() => Ok(token),
        _ => Err(Error::Configuration(format!(
            "{BOT_TOKEN_VAR} is not set; export the bot credential before publishing"
        ))),
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The fixed set of condition abbreviations the weather provider emits.
///
/// Every variant owns a banner image, so mapping a recognised code to a
/// file never falls back; only strings outside this set do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionCode {
    Snow,
    Sleet,
    Hail,
    Thunderstorm,
    HeavyRain,
    LightRain,
    Showers,
    HeavyCloud,
    LightCloud,
    Clear,
}

impl ConditionCode {
    /// Parse a provider abbreviation, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "sn" => Some(ConditionCode::Snow),
            "sl" => Some(ConditionCode::Sleet),
            "h" => Some(ConditionCode::Hail),
            "t" => Some(ConditionCode::Thunderstorm),
            "hr" => Some(ConditionCode::HeavyRain),
            "lr" => Some(ConditionCode::LightRain),
            "s" => Some(ConditionCode::Showers),
            "hc" => Some(ConditionCode::HeavyCloud),
            "lc" => Some(ConditionCode::LightCloud),
            "c" => Some(ConditionCode::Clear),
            _ => None,
        }
    }

    pub fn abbr(&self) -> &'static str {
        match self {
            ConditionCode::Snow => "sn",
            ConditionCode::Sleet => "sl",
            ConditionCode::Hail => "h",
            ConditionCode::Thunderstorm => "t",
            ConditionCode::HeavyRain => "hr",
            ConditionCode::LightRain => "lr",
            ConditionCode::Showers => "s",
            ConditionCode::HeavyCloud => "hc",
            ConditionCode::LightCloud => "lc",
            ConditionCode::Clear => "c",
        }
    }

    /// Banner image file for this condition. Total over the enum: sleet
    /// and hail share the snow banner, showers share the rain one.
    pub fn image_file(&self) -> &'static str {
        match self {
            ConditionCode::Snow | ConditionCode::Sleet | ConditionCode::Hail => "snow.png",
            ConditionCode::Thunderstorm => "storm.png",
            ConditionCode::HeavyRain | ConditionCode::LightRain | ConditionCode::Showers => {
                "rain.png"
            }
            ConditionCode::HeavyCloud => "cloudy.png",
            ConditionCode::LightCloud | ConditionCode::Clear => "sunny.png",
        }
    }

    pub const fn all() -> &'static [ConditionCode] {
        &[
            ConditionCode::Snow,
            ConditionCode::Sleet,
            ConditionCode::Hail,
            ConditionCode::Thunderstorm,
            ConditionCode::HeavyRain,
            ConditionCode::LightRain,
            ConditionCode::Showers,
            ConditionCode::HeavyCloud,
            ConditionCode::LightCloud,
            ConditionCode::Clear,
        ]
    }
}

impl std::fmt::Display for ConditionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.abbr())
    }
}

/// One entry from the provider's location search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationHit {
    pub woeid: u64,
    pub title: String,
}

/// Current conditions for a resolved location, reduced to the fields
/// the pipeline consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: String,
    pub state_abbr: String,
    pub state_name: String,
    pub applicable_date: NaiveDate,
}

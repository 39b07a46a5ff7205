use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::Error,
    model::{LocationHit, WeatherReport},
};

use super::WeatherProvider;

/// Client for the MetaWeather-compatible REST API.
#[derive(Debug, Clone)]
pub struct MetaWeatherProvider {
    api_base: String,
    http: Client,
}

impl MetaWeatherProvider {
    pub fn new(api_base: String) -> Self {
        Self { api_base, http: Client::new() }
    }

    async fn fetch_body(&self, url: &str, query: &[(&str, &str)]) -> crate::Result<String> {
        let res = self.http.get(url).query(query).send().await.map_err(|e| Error::Upstream {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| Error::Upstream {
            url: url.to_string(),
            reason: format!("failed to read response body: {e}"),
        })?;

        if !status.is_success() {
            return Err(Error::Upstream {
                url: url.to_string(),
                reason: format!("status {}: {}", status, truncate_body(&body)),
            });
        }

        debug!(url, body = %body, "weather provider replied");
        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct MwLocationHit {
    woeid: u64,
    title: String,
}

#[derive(Debug, Deserialize)]
struct MwConsolidated {
    weather_state_name: String,
    weather_state_abbr: String,
    applicable_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
struct MwLocationDetail {
    title: String,
    consolidated_weather: Vec<MwConsolidated>,
}

#[async_trait]
impl WeatherProvider for MetaWeatherProvider {
    async fn search(&self, query: &str) -> crate::Result<Vec<LocationHit>> {
        let url = format!("{}/location/search/", self.api_base);
        let body = self.fetch_body(&url, &[("query", query)]).await?;

        let parsed: Vec<MwLocationHit> =
            serde_json::from_str(&body).map_err(|e| Error::MalformedResponse {
                url: url.clone(),
                detail: e.to_string(),
            })?;

        Ok(parsed
            .into_iter()
            .map(|hit| LocationHit { woeid: hit.woeid, title: hit.title })
            .collect())
    }

    async fn current_report(&self, woeid: u64) -> crate::Result<WeatherReport> {
        let url = format!("{}/location/{}/", self.api_base, woeid);
        let body = self.fetch_body(&url, &[]).await?;

        let parsed: MwLocationDetail =
            serde_json::from_str(&body).map_err(|e| Error::MalformedResponse {
                url: url.clone(),
                detail: e.to_string(),
            })?;

        // First entry is the provider's "current" observation; later
        // entries are forecast days and are ignored.
        let current = parsed.consolidated_weather.into_iter().next().ok_or_else(|| {
            Error::MalformedResponse {
                url: url.clone(),
                detail: "consolidated_weather list is empty".to_string(),
            }
        })?;

        Ok(WeatherReport {
            location: parsed.title,
            state_abbr: current.weather_state_abbr,
            state_name: current.weather_state_name,
            applicable_date: current.applicable_date,
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX { format!("{}...", &body[..MAX]) } else { body.to_string() }
}

use crate::{
    Config,
    error::Error,
    model::{LocationHit, WeatherReport},
    provider::metaweather::MetaWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;
use tracing::info;

pub mod metaweather;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Search locations matching a free-text query, best match first.
    async fn search(&self, query: &str) -> crate::Result<Vec<LocationHit>>;

    /// Current conditions for a canonical location id.
    async fn current_report(&self, woeid: u64) -> crate::Result<WeatherReport>;
}

/// Construct the weather provider from config.
pub fn provider_from_config(config: &Config) -> Box<dyn WeatherProvider> {
    Box::new(MetaWeatherProvider::new(config.weather.api_base.clone()))
}

/// Turn a location query into a canonical WhereOnEarth id.
///
/// Purely numeric queries are already canonical and never touch the
/// network. Anything else goes through the provider's search; the first
/// hit wins, an empty hit list is an explicit [`Error::LocationNotFound`].
pub async fn resolve(provider: &dyn WeatherProvider, query: &str) -> crate::Result<u64> {
    if !query.is_empty() && query.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(woeid) = query.parse::<u64>() {
            return Ok(woeid);
        }
        // Digit string too large for a woeid; let the search decide.
    }

    let hits = provider.search(query).await?;
    let first = hits
        .first()
        .ok_or_else(|| Error::LocationNotFound { query: query.to_string() })?;

    info!(woeid = first.woeid, title = %first.title, "resolved location query");
    Ok(first.woeid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct StubProvider {
        hits: Vec<LocationHit>,
        searches: AtomicUsize,
    }

    #[async_trait]
    impl WeatherProvider for StubProvider {
        async fn search(&self, _query: &str) -> crate::Result<Vec<LocationHit>> {
            self.searches.fetch_add(1, Ordering::SeqCst);
            Ok(self.hits.clone())
        }

        async fn current_report(&self, _woeid: u64) -> crate::Result<WeatherReport> {
            unreachable!("resolve never fetches a report")
        }
    }

    #[tokio::test]
    async fn numeric_query_passes_through_without_searching() {
        let provider = StubProvider::default();

        let woeid = resolve(&provider, "102840").await.expect("numeric query must resolve");

        assert_eq!(woeid, 102_840);
        assert_eq!(provider.searches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn free_text_query_takes_the_first_hit() {
        let provider = StubProvider {
            hits: vec![
                LocationHit { woeid: 44418, title: "London".to_string() },
                LocationHit { woeid: 4118, title: "Toronto".to_string() },
            ],
            ..StubProvider::default()
        };

        let woeid = resolve(&provider, "london").await.expect("search must resolve");

        assert_eq!(woeid, 44418);
        assert_eq!(provider.searches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_search_result_is_not_found() {
        let provider = StubProvider::default();

        let err = resolve(&provider, "atlantis").await.unwrap_err();

        assert!(matches!(err, Error::LocationNotFound { ref query } if query == "atlantis"));
    }

    #[tokio::test]
    async fn oversized_digit_string_falls_back_to_search() {
        let provider = StubProvider::default();

        // Does not fit u64, so it is treated as a text query.
        let err = resolve(&provider, "99999999999999999999999999").await.unwrap_err();

        assert!(matches!(err, Error::LocationNotFound { .. }));
        assert_eq!(provider.searches.load(Ordering::SeqCst), 1);
    }
}

use crate::{
    Config,
    error::ProviderError,
    model::{AirQualityReading, Coordinates, ForecastPoint, NewsArticle, WeatherSnapshot},
    provider::{newsapi::NewsApiProvider, openweather::OpenWeatherProvider},
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug};

pub mod newsapi;
pub mod openweather;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    NewsApi,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::NewsApi => "newsapi",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::NewsApi]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            "newsapi" => Ok(ProviderId::NewsApi),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, newsapi."
            )),
        }
    }
}

/// Read-only weather queries. Implementations are stateless request/response
/// clients; each call is a single idempotent outbound request.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, city: &str) -> Result<WeatherSnapshot, ProviderError>;

    /// Full forecast sequence as returned upstream; callers decide how much
    /// of it to show.
    async fn forecast(&self, city: &str) -> Result<Vec<ForecastPoint>, ProviderError>;

    async fn air_quality(&self, lat: f64, lon: f64) -> Result<AirQualityReading, ProviderError>;

    /// Resolve a city name to coordinates. An empty result set upstream is
    /// reported as [`ProviderError::NotFound`], never dereferenced.
    async fn resolve_coordinates(&self, city: &str) -> Result<Coordinates, ProviderError>;
}

/// Read-only news queries.
#[async_trait]
pub trait NewsProvider: Send + Sync + Debug {
    async fn top_headlines(&self) -> Result<Vec<NewsArticle>, ProviderError>;

    /// Search with the query passed verbatim; the transport handles escaping.
    async fn search(&self, query: &str) -> Result<Vec<NewsArticle>, ProviderError>;
}

fn require_api_key<'a>(config: &'a Config, id: ProviderId) -> anyhow::Result<&'a str> {
    config.provider_api_key(id).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for provider '{id}'.\n\
                 Hint: run `skywatch configure {id}` and enter your API key."
        )
    })
}

/// Construct the weather provider from config.
pub fn weather_provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = require_api_key(config, ProviderId::OpenWeather)?;
    Ok(Box::new(OpenWeatherProvider::new(api_key.to_owned())))
}

/// Construct the news provider from config.
pub fn news_provider_from_config(config: &Config) -> anyhow::Result<Box<dyn NewsProvider>> {
    let api_key = require_api_key(config, ProviderId::NewsApi)?;
    Ok(Box::new(NewsApiProvider::new(api_key.to_owned())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn provider_id_as_str_roundtrip() {
        for id in ProviderId::all() {
            let s = id.as_str();
            let parsed = ProviderId::try_from(s).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
    }

    #[test]
    fn unknown_provider_error() {
        let err = ProviderId::try_from("doesnotexist").unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }

    #[test]
    fn weather_provider_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = weather_provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured for provider"));
        assert!(err.to_string().contains("skywatch configure openweather"));
    }

    #[test]
    fn news_provider_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = news_provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("skywatch configure newsapi"));
    }

    #[test]
    fn providers_build_when_keys_configured() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "WEATHER_KEY".to_string());
        cfg.upsert_provider_api_key(ProviderId::NewsApi, "NEWS_KEY".to_string());

        assert!(weather_provider_from_config(&cfg).is_ok());
        assert!(news_provider_from_config(&cfg).is_ok());
    }
}

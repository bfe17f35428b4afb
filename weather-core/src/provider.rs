use crate::{
    Config, DisplayUnit, ImageResult, LocationQuery, WeatherReading,
    error::{ImageError, WeatherError},
    provider::{giphy::GiphyProvider, openweather::OpenWeatherProvider},
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug};
use tracing::info;

pub mod giphy;
pub mod openweather;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    Giphy,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::Giphy => "giphy",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::Giphy]
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
            "giphy" => Ok(ProviderId::Giphy),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, giphy."
            )),
        }
    }
}

/// Source of current weather readings.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch the reading for `query`, with temperatures in `unit`.
    async fn fetch(
        &self,
        query: &LocationQuery,
        unit: DisplayUnit,
    ) -> Result<WeatherReading, WeatherError>;
}

/// Source of a decorative image for a search term.
#[async_trait]
pub trait ImageProvider: Send + Sync + Debug {
    async fn search(&self, term: &str) -> Result<ImageResult, ImageError>;
}

/// Construct the weather provider from config.
pub fn weather_provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let id = ProviderId::OpenWeather;
    let provider_cfg = config.provider_config(id).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for provider '{id}'.\n\
                 Hint: run `weather configure {id}` and enter your API key."
        )
    })?;

    let provider = OpenWeatherProvider::from_config(provider_cfg)?;
    Ok(Box::new(provider))
}

/// Construct the image provider from config; `None` when no key is configured.
pub fn image_provider_from_config(
    config: &Config,
) -> anyhow::Result<Option<Box<dyn ImageProvider>>> {
    let Some(provider_cfg) = config.provider_config(ProviderId::Giphy) else {
        info!("no giphy API key configured, images disabled");
        return Ok(None);
    };

    let provider = GiphyProvider::from_config(provider_cfg)?;
    Ok(Some(Box::new(provider)))
}

/// Cut a response body down for error messages.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
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
        let msg = err.to_string();
        assert!(msg.contains("No API key configured for provider 'openweather'"));
        assert!(msg.contains("Hint: run `weather configure openweather`"));
    }

    #[test]
    fn weather_provider_builds_when_configured() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "KEY".to_string());

        assert!(weather_provider_from_config(&cfg).is_ok());
    }

    #[test]
    fn image_provider_is_optional() {
        let mut cfg = Config::default();
        assert!(image_provider_from_config(&cfg).unwrap().is_none());

        cfg.upsert_provider_api_key(ProviderId::Giphy, "KEY".to_string());
        assert!(image_provider_from_config(&cfg).unwrap().is_some());
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(150);
        let cut = truncate_body(&body);
        assert!(cut.ends_with("..."));
        assert!(cut.len() <= 203);
    }
}

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::{
    config::ProviderConfig,
    error::WeatherError,
    location::LocationQuery,
    model::{DisplayUnit, WeatherReading},
};

use super::{WeatherProvider, truncate_body};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    pub fn from_config(cfg: &ProviderConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;

        Ok(Self {
            api_key: cfg.api_key.clone(),
            base_url: cfg
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            http,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Query parameters for `query`, without the credential.
    fn location_params(query: &LocationQuery) -> (&'static str, String) {
        match query {
            LocationQuery::ByZip { code } => ("zip", code.clone()),
            LocationQuery::ByCity { name } => ("q", name.clone()),
            LocationQuery::ByCityStateCountry { city, state, country } => {
                ("q", format!("{city},{state},{country}"))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
    feels_like: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: Option<i64>,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

/// The `cod` field is a number on success and a numeric string on failure.
fn status_code(body: &Value) -> Option<i64> {
    match body.get("cod")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Turn a decoded provider payload into a reading, checking `cod` first.
pub(crate) fn normalize(body: Value) -> Result<WeatherReading, WeatherError> {
    let code = status_code(&body)
        .ok_or_else(|| WeatherError::MalformedResponse("missing `cod` status".into()))?;

    if code != 200 {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown provider error")
            .to_string();
        return Err(WeatherError::ProviderRejected { code, message });
    }

    let parsed: OwCurrentResponse = serde_json::from_value(body)
        .map_err(|e| WeatherError::MalformedResponse(e.to_string()))?;

    let description = parsed
        .weather
        .into_iter()
        .next()
        .map(|w| w.description)
        .ok_or_else(|| WeatherError::MalformedResponse("empty `weather` list".into()))?;

    Ok(WeatherReading {
        min_temp: parsed.main.temp_min,
        max_temp: parsed.main.temp_max,
        current_temp: parsed.main.temp,
        feels_like: parsed.main.feels_like,
        description,
        wind_speed: parsed.wind.speed,
        location_name: parsed.name,
        observed_at: parsed.dt.and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
    })
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self), fields(provider = "openweather"))]
    async fn fetch(
        &self,
        query: &LocationQuery,
        unit: DisplayUnit,
    ) -> Result<WeatherReading, WeatherError> {
        let url = format!("{}/weather", self.base_url);
        let (key, value) = Self::location_params(query);

        debug!(%url, key, value = %value, units = unit.provider_keyword(), "requesting weather");

        let res = self
            .http
            .get(&url)
            .query(&[
                (key, value.as_str()),
                ("units", unit.provider_keyword()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| WeatherError::Transport(e.without_url().to_string()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| {
                WeatherError::Transport(format!("failed to read body: {}", e.without_url()))
            })?;

        // Rejections arrive with a `cod` in the body whatever the HTTP status.
        match serde_json::from_str::<Value>(&body) {
            Ok(json) => normalize(json),
            Err(_) if !status.is_success() => Err(WeatherError::Transport(format!(
                "HTTP {status}: {}",
                truncate_body(&body)
            ))),
            Err(e) => Err(WeatherError::MalformedResponse(format!(
                "{e}: {}",
                truncate_body(&body)
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn london() -> Value {
        json!({
            "cod": 200,
            "name": "London",
            "dt": 1_700_000_000,
            "main": { "temp": 11.27, "temp_min": 9.9, "temp_max": 12.51, "feels_like": 10.4 },
            "weather": [
                { "description": "light rain" },
                { "description": "mist" }
            ],
            "wind": { "speed": 4.63 }
        })
    }

    #[test]
    fn normalizes_success_payload() {
        let reading = normalize(london()).unwrap();

        assert_eq!(reading.location_name, "London");
        assert_eq!(reading.description, "light rain");
        assert_eq!(reading.current_temp, 11.27);
        assert_eq!(reading.min_temp, 9.9);
        assert_eq!(reading.max_temp, 12.51);
        assert_eq!(reading.feels_like, 10.4);
        assert_eq!(reading.wind_speed, 4.63);
        assert_eq!(reading.observed_at.unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn string_cod_rejection_keeps_message() {
        let err = normalize(json!({ "cod": "404", "message": "city not found" })).unwrap_err();
        match err {
            WeatherError::ProviderRejected { code, message } => {
                assert_eq!(code, 404);
                assert_eq!(message, "city not found");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn numeric_cod_rejection() {
        let err = normalize(json!({ "cod": 401, "message": "Invalid API key" })).unwrap_err();
        assert!(matches!(err, WeatherError::ProviderRejected { code: 401, .. }));
    }

    #[test]
    fn missing_nested_fields_are_malformed() {
        let mut body = london();
        body["main"].as_object_mut().unwrap().remove("feels_like");
        assert!(matches!(normalize(body), Err(WeatherError::MalformedResponse(_))));

        let mut body = london();
        body["weather"] = json!([]);
        assert!(matches!(normalize(body), Err(WeatherError::MalformedResponse(_))));

        assert!(matches!(normalize(json!({ "name": "x" })), Err(WeatherError::MalformedResponse(_))));
    }

    #[test]
    fn location_params_per_shape() {
        assert_eq!(
            OpenWeatherProvider::location_params(&LocationQuery::ByZip { code: "10001".into() }),
            ("zip", "10001".to_string())
        );
        assert_eq!(
            OpenWeatherProvider::location_params(&LocationQuery::ByCity { name: "Oslo".into() }),
            ("q", "Oslo".to_string())
        );
        assert_eq!(
            OpenWeatherProvider::location_params(&LocationQuery::ByCityStateCountry {
                city: "Springfield".into(),
                state: "IL".into(),
                country: "US".into(),
            }),
            ("q", "Springfield,IL,US".to_string())
        );
    }
}

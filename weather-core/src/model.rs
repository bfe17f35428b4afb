use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Temperature unit selected by the user.
///
/// The selected unit decides what the weather provider returns, and which
/// formula a later toggle applies to the rendered values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DisplayUnit {
    #[default]
    #[serde(rename = "c")]
    Celsius,
    #[serde(rename = "f")]
    Fahrenheit,
}

impl DisplayUnit {
    /// Unit keyword understood by the weather provider.
    pub fn provider_keyword(&self) -> &'static str {
        match self {
            DisplayUnit::Celsius => "metric",
            DisplayUnit::Fahrenheit => "imperial",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            DisplayUnit::Celsius => "\u{2103}",
            DisplayUnit::Fahrenheit => "\u{2109}",
        }
    }

    /// Wind speed unit the provider uses for this unit system.
    pub fn wind_unit(&self) -> &'static str {
        match self {
            DisplayUnit::Celsius => "m/s",
            DisplayUnit::Fahrenheit => "mph",
        }
    }

    /// Short form used by the unit selector (`c` / `f`).
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayUnit::Celsius => "c",
            DisplayUnit::Fahrenheit => "f",
        }
    }

    pub fn other(&self) -> DisplayUnit {
        match self {
            DisplayUnit::Celsius => DisplayUnit::Fahrenheit,
            DisplayUnit::Fahrenheit => DisplayUnit::Celsius,
        }
    }
}

impl std::fmt::Display for DisplayUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for DisplayUnit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "c" | "celsius" | "metric" => Ok(DisplayUnit::Celsius),
            "f" | "fahrenheit" | "imperial" => Ok(DisplayUnit::Fahrenheit),
            _ => Err(anyhow::anyhow!("Unknown unit '{value}'. Supported units: c, f.")),
        }
    }
}

/// Normalized weather snapshot for one location.
///
/// Temperatures are in whatever unit the request asked for; the reading does
/// not record that unit itself.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    pub min_temp: f64,
    pub max_temp: f64,
    pub current_temp: f64,
    pub feels_like: f64,
    pub description: String,
    pub wind_speed: f64,
    pub location_name: String,
    pub observed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResult {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_keywords_match_provider() {
        assert_eq!(DisplayUnit::Celsius.provider_keyword(), "metric");
        assert_eq!(DisplayUnit::Fahrenheit.provider_keyword(), "imperial");
    }

    #[test]
    fn unit_parses_selector_values() {
        assert_eq!(DisplayUnit::try_from("c").unwrap(), DisplayUnit::Celsius);
        assert_eq!(DisplayUnit::try_from("F").unwrap(), DisplayUnit::Fahrenheit);
        assert!(DisplayUnit::try_from("kelvin").is_err());
    }

    #[test]
    fn other_flips_unit() {
        assert_eq!(DisplayUnit::Celsius.other(), DisplayUnit::Fahrenheit);
        assert_eq!(DisplayUnit::Fahrenheit.other(), DisplayUnit::Celsius);
    }
}

use std::sync::LazyLock;

use regex::Regex;

use crate::{error::ConversionError, model::DisplayUnit};

// Optional leading minus, digits, optional fractional part.
static NUMERIC_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("numeric token pattern is valid"));

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    round1(celsius * 9.0 / 5.0 + 32.0)
}

pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    round1((fahrenheit - 32.0) * 5.0 / 9.0)
}

/// Convert a value that is currently shown in the other unit into `target`.
pub fn convert_to(value: f64, target: DisplayUnit) -> f64 {
    match target {
        DisplayUnit::Celsius => fahrenheit_to_celsius(value),
        DisplayUnit::Fahrenheit => celsius_to_fahrenheit(value),
    }
}

/// First signed integer or decimal substring of `text`.
pub fn extract_numeric_token(text: &str) -> Result<&str, ConversionError> {
    NUMERIC_TOKEN
        .find(text)
        .map(|m| m.as_str())
        .ok_or_else(|| ConversionError::NoNumericToken(text.to_string()))
}

/// Format a temperature the way panels show it: one decimal, no unit.
pub fn format_temp(value: f64) -> String {
    // avoid "-0.0" after rounding tiny negatives
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value:.1}")
}

/// Read the number out of `text` and convert it to `target`.
pub fn convert_rendered(text: &str, target: DisplayUnit) -> Result<f64, ConversionError> {
    let token = extract_numeric_token(text)?;
    let value: f64 = token
        .parse()
        .map_err(|_| ConversionError::NoNumericToken(text.to_string()))?;
    Ok(convert_to(value, target))
}

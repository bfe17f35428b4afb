use thiserror::Error;

/// Guidance shown when the search input has an unsupported shape.
pub const LOCATION_GUIDANCE: &str =
    "Must enter one of the following: city / city,state,country / zipcode";

const GENERIC_WEATHER_FAILURE: &str = "Something went wrong fetching the weather. Please try again.";

/// Input does not match any accepted location shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassificationError {
    #[error("{} (got {tokens} comma-separated parts)", LOCATION_GUIDANCE)]
    InvalidShape { tokens: usize },
}

#[derive(Debug, Error)]
pub enum WeatherError {
    /// The provider answered with a non-200 `cod`.
    #[error("{message}")]
    ProviderRejected { code: i64, message: String },

    #[error("Malformed weather response: {0}")]
    MalformedResponse(String),

    #[error("Weather request failed: {0}")]
    Transport(String),
}

impl WeatherError {
    /// Text for the error panel.
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::ProviderRejected { message, .. } => message.clone(),
            WeatherError::MalformedResponse(_) | WeatherError::Transport(_) => {
                GENERIC_WEATHER_FAILURE.to_string()
            }
        }
    }
}

/// Image lookup failures. These are logged and never reach the user.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Image request failed: {0}")]
    Transport(String),

    #[error("Image provider returned HTTP {0}")]
    Rejected(u16),

    #[error("Malformed image response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("No numeric value found in '{0}'")]
    NoNumericToken(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_displays_provider_message_verbatim() {
        let err = WeatherError::ProviderRejected {
            code: 404,
            message: "city not found".into(),
        };
        assert_eq!(err.to_string(), "city not found");
        assert_eq!(err.user_message(), "city not found");
    }

    #[test]
    fn malformed_and_transport_are_generic_for_users() {
        let malformed = WeatherError::MalformedResponse("missing field `main`".into());
        let transport = WeatherError::Transport("connection refused".into());

        assert_eq!(malformed.user_message(), GENERIC_WEATHER_FAILURE);
        assert_eq!(transport.user_message(), GENERIC_WEATHER_FAILURE);
        assert!(malformed.to_string().contains("missing field"));
    }

    #[test]
    fn invalid_shape_carries_guidance() {
        let err = ClassificationError::InvalidShape { tokens: 2 };
        let msg = err.to_string();
        assert!(msg.starts_with(LOCATION_GUIDANCE));
        assert!(msg.contains('2'));
    }
}

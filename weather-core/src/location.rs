use crate::error::ClassificationError;

/// Shape of a free-text location search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationQuery {
    ByZip { code: String },
    ByCity { name: String },
    ByCityStateCountry { city: String, state: String, country: String },
}

impl LocationQuery {
    /// Split `input` on commas and classify it.
    ///
    /// One all-digit token is a zip code, any other single token is a city
    /// name, and exactly three tokens are city, state and country in that
    /// order. Tokens are trimmed; nothing else is validated here.
    pub fn classify(input: &str) -> Result<Self, ClassificationError> {
        let tokens: Vec<&str> = input.split(',').map(str::trim).collect();

        match tokens.as_slice() {
            [single] if single.is_empty() => Err(ClassificationError::InvalidShape { tokens: 0 }),
            [single] if is_all_digits(single) => Ok(LocationQuery::ByZip { code: single.to_string() }),
            [single] => Ok(LocationQuery::ByCity { name: single.to_string() }),
            [city, state, country] => Ok(LocationQuery::ByCityStateCountry {
                city: city.to_string(),
                state: state.to_string(),
                country: country.to_string(),
            }),
            other => Err(ClassificationError::InvalidShape { tokens: other.len() }),
        }
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationQuery::ByZip { code } => write!(f, "zip {code}"),
            LocationQuery::ByCity { name } => write!(f, "city {name}"),
            LocationQuery::ByCityStateCountry { city, state, country } => {
                write!(f, "city {city},{state},{country}")
            }
        }
    }
}

fn is_all_digits(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_only_is_zip() {
        for input in ["10001", "0", " 94103 "] {
            let query = LocationQuery::classify(input).unwrap();
            assert!(matches!(query, LocationQuery::ByZip { .. }), "{input} -> {query:?}");
        }
        assert_eq!(
            LocationQuery::classify("10001").unwrap(),
            LocationQuery::ByZip { code: "10001".into() }
        );
    }

    #[test]
    fn non_digit_single_token_is_city() {
        for input in ["London", "New York", "10001a", "-5", "1.5", "São Paulo"] {
            let query = LocationQuery::classify(input).unwrap();
            assert!(matches!(query, LocationQuery::ByCity { .. }), "{input} -> {query:?}");
        }
    }

    #[test]
    fn three_tokens_keep_order() {
        let query = LocationQuery::classify("Springfield, IL, US").unwrap();
        assert_eq!(
            query,
            LocationQuery::ByCityStateCountry {
                city: "Springfield".into(),
                state: "IL".into(),
                country: "US".into(),
            }
        );
    }

    #[test]
    fn other_token_counts_are_invalid_shape() {
        assert_eq!(
            LocationQuery::classify(""),
            Err(ClassificationError::InvalidShape { tokens: 0 })
        );
        assert_eq!(
            LocationQuery::classify("   "),
            Err(ClassificationError::InvalidShape { tokens: 0 })
        );
        assert_eq!(
            LocationQuery::classify("Paris,FR"),
            Err(ClassificationError::InvalidShape { tokens: 2 })
        );
        assert_eq!(
            LocationQuery::classify("a,b,c,d"),
            Err(ClassificationError::InvalidShape { tokens: 4 })
        );
        assert_eq!(
            LocationQuery::classify("a,b,c,d,e,f"),
            Err(ClassificationError::InvalidShape { tokens: 6 })
        );
    }
}

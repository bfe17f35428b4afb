//! Core library for the `weather` widget.
//!
//! This crate defines:
//! - Classification of free-text location searches
//! - Weather and image providers behind async traits
//! - Celsius/Fahrenheit conversion of rendered values
//! - The widget state machine and its render port
//! - Configuration & credentials handling
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod config;
pub mod error;
pub mod location;
pub mod model;
pub mod provider;
pub mod units;
pub mod widget;

pub use config::{Config, ProviderConfig};
pub use error::{ClassificationError, ConversionError, ImageError, WeatherError};
pub use location::LocationQuery;
pub use model::{DisplayUnit, ImageResult, WeatherReading};
pub use provider::{ImageProvider, ProviderId, WeatherProvider};
pub use widget::{AppState, Panels, Phase, RenderPort, Widget};

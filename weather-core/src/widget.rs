use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::{
    error::ConversionError,
    location::LocationQuery,
    model::{DisplayUnit, WeatherReading},
    provider::{ImageProvider, WeatherProvider},
    units::{convert_rendered, format_temp},
};

pub const HIGH_LABEL: &str = "H: ";
pub const LOW_LABEL: &str = "L: ";
pub const FEEL_LABEL: &str = "Feels like ";

/// Prepended to the weather description to form the image search term.
pub const IMAGE_TERM_PREFIX: &str = "weather sky ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Displayed,
    Error,
}

/// Rendered text of every weather pane.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Panels {
    pub location_name: String,
    pub summary: String,
    pub current: String,
    pub high: String,
    pub low: String,
    pub feels_like: String,
    pub wind: String,
    pub observed_at: Option<DateTime<Utc>>,
}

fn render_temp(label: &str, value: f64, unit: DisplayUnit) -> String {
    format!("{label}{} {}", format_temp(value), unit.symbol())
}

impl Panels {
    /// Render `reading`, whose temperatures are in `unit`.
    pub fn from_reading(reading: &WeatherReading, unit: DisplayUnit) -> Self {
        Self {
            location_name: reading.location_name.clone(),
            summary: reading.description.clone(),
            current: render_temp("", reading.current_temp, unit),
            high: render_temp(HIGH_LABEL, reading.max_temp, unit),
            low: render_temp(LOW_LABEL, reading.min_temp, unit),
            feels_like: render_temp(FEEL_LABEL, reading.feels_like, unit),
            wind: format!("Wind: {:.1} {}", reading.wind_speed, unit.wind_unit()),
            observed_at: reading.observed_at,
        }
    }

    /// Re-render the four temperature panes in `target`, converting from the
    /// values currently shown. Nothing changes unless all four convert.
    pub fn converted(&self, target: DisplayUnit) -> Result<Self, ConversionError> {
        let current = convert_rendered(&self.current, target)?;
        let high = convert_rendered(&self.high, target)?;
        let low = convert_rendered(&self.low, target)?;
        let feels_like = convert_rendered(&self.feels_like, target)?;

        Ok(Self {
            current: render_temp("", current, target),
            high: render_temp(HIGH_LABEL, high, target),
            low: render_temp(LOW_LABEL, low, target),
            feels_like: render_temp(FEEL_LABEL, feels_like, target),
            ..self.clone()
        })
    }

    /// The four temperature panes in display order.
    pub fn temperatures(&self) -> [&str; 4] {
        [&self.current, &self.high, &self.low, &self.feels_like]
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub phase: Phase,
    /// Last unit the user selected.
    pub unit: DisplayUnit,
    pub panels: Option<Panels>,
    pub image_url: Option<String>,
    pub error: Option<String>,
}

impl AppState {
    pub fn new(unit: DisplayUnit) -> Self {
        Self { unit, ..Self::default() }
    }

    /// A search was submitted. Clears any previous error; the old panes stay
    /// visible until the search resolves.
    pub fn begin_search(&self) -> Self {
        Self {
            phase: Phase::Loading,
            error: None,
            ..self.clone()
        }
    }

    /// The reading arrived, in `unit`. Any image from an earlier search is
    /// dropped.
    pub fn weather_loaded(&self, reading: &WeatherReading, unit: DisplayUnit) -> Self {
        Self {
            phase: Phase::Displayed,
            unit,
            panels: Some(Panels::from_reading(reading, unit)),
            image_url: None,
            error: None,
        }
    }

    /// Search failed; clears the weather and image panes.
    pub fn search_failed(&self, message: impl Into<String>) -> Self {
        Self {
            phase: Phase::Error,
            unit: self.unit,
            panels: None,
            image_url: None,
            error: Some(message.into()),
        }
    }

    /// An image arrived. Only applies while a reading is displayed.
    pub fn image_loaded(&self, url: impl Into<String>) -> Self {
        if self.phase != Phase::Displayed {
            return self.clone();
        }
        Self {
            image_url: Some(url.into()),
            ..self.clone()
        }
    }

    /// The user picked `target` in the unit selector. Converts the rendered
    /// text, so repeated toggles can drift by a tenth of a degree.
    pub fn unit_toggled(&self, target: DisplayUnit) -> Result<Self, ConversionError> {
        if target == self.unit {
            return Ok(self.clone());
        }

        let panels = self
            .panels
            .as_ref()
            .map(|panels| panels.converted(target))
            .transpose()?;

        Ok(Self {
            unit: target,
            panels,
            ..self.clone()
        })
    }
}

/// Render target for widget state.
pub trait RenderPort {
    fn render(&mut self, state: &AppState);
}

/// Drives searches and toggles against the providers. The image lookup runs
/// after the reading is displayed and can only add an image.
///
/// Handlers take `&mut self`, so a search or toggle always finishes before
/// the next one starts.
#[derive(Debug)]
pub struct Widget<R: RenderPort> {
    weather: Box<dyn WeatherProvider>,
    images: Option<Box<dyn ImageProvider>>,
    renderer: R,
    state: AppState,
}

impl<R: RenderPort> Widget<R> {
    pub fn new(
        weather: Box<dyn WeatherProvider>,
        images: Option<Box<dyn ImageProvider>>,
        renderer: R,
        unit: DisplayUnit,
    ) -> Self {
        Self {
            weather,
            images,
            renderer,
            state: AppState::new(unit),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    fn apply(&mut self, next: AppState) {
        if next.phase != self.state.phase {
            info!(from = ?self.state.phase, to = ?next.phase, "widget phase change");
        }
        self.state = next;
        self.renderer.render(&self.state);
    }

    /// Run one search for the raw `input` and return the resulting phase.
    pub async fn search(&mut self, input: &str) -> Phase {
        self.apply(self.state.begin_search());

        let query = match LocationQuery::classify(input) {
            Ok(query) => query,
            Err(e) => {
                debug!(input, error = %e, "rejected search input");
                self.apply(self.state.search_failed(e.to_string()));
                return self.state.phase;
            }
        };

        let unit = self.state.unit;
        let reading = match self.weather.fetch(&query, unit).await {
            Ok(reading) => reading,
            Err(e) => {
                warn!(%query, error = %e, "weather lookup failed");
                self.apply(self.state.search_failed(e.user_message()));
                return self.state.phase;
            }
        };

        self.apply(self.state.weather_loaded(&reading, unit));

        let term = format!("{IMAGE_TERM_PREFIX}{}", reading.description);
        let image = match &self.images {
            Some(images) => Some(images.search(&term).await),
            None => None,
        };

        match image {
            Some(Ok(image)) => self.apply(self.state.image_loaded(image.url)),
            Some(Err(e)) => warn!(term, error = %e, "image lookup failed"),
            None => {}
        }

        self.state.phase
    }

    /// Switch the displayed unit without re-fetching.
    pub fn toggle_unit(&mut self, target: DisplayUnit) -> Result<(), ConversionError> {
        let next = self.state.unit_toggled(target)?;
        self.apply(next);
        Ok(())
    }
}

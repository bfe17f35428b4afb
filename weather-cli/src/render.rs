use std::io::Write;

use chrono::Local;
use weather_core::{AppState, Panels, Phase, RenderPort};

/// Prints widget state changes as plain text.
///
/// Only the panes that changed since the previous frame are printed, so the
/// image line shows up after the weather it belongs to.
#[derive(Debug)]
pub struct TerminalRenderer<W: Write> {
    out: W,
    last: Option<AppState>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, last: None }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

fn panel_lines(panels: &Panels) -> Vec<String> {
    let mut lines = vec![
        panels.location_name.clone(),
        panels.summary.clone(),
        panels.current.clone(),
        format!("{}  {}", panels.high, panels.low),
        panels.feels_like.clone(),
        panels.wind.clone(),
    ];
    if let Some(observed) = panels.observed_at {
        lines.push(format!(
            "Observed {}",
            observed.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        ));
    }
    lines
}

/// Lines to print for `state`, given the previously rendered frame.
pub fn frame_lines(state: &AppState, prev: Option<&AppState>) -> Vec<String> {
    let mut lines = Vec::new();
    let prev_phase = prev.map(|p| p.phase);

    match state.phase {
        Phase::Idle => {}
        Phase::Loading => {
            if prev_phase != Some(Phase::Loading) {
                lines.push("Loading...".to_string());
            }
        }
        Phase::Error => {
            if let Some(error) = &state.error {
                if prev.and_then(|p| p.error.as_ref()) != Some(error) {
                    lines.push(format!("Error: {error}"));
                }
            }
        }
        Phase::Displayed => {
            if let Some(panels) = &state.panels {
                if prev.and_then(|p| p.panels.as_ref()) != Some(panels)
                    || prev_phase != Some(Phase::Displayed)
                {
                    lines.extend(panel_lines(panels));
                }
            }
            if let Some(url) = &state.image_url {
                if prev.and_then(|p| p.image_url.as_ref()) != Some(url) {
                    lines.push(format!("Image: {url}"));
                }
            }
        }
    }

    lines
}

impl<W: Write> RenderPort for TerminalRenderer<W> {
    fn render(&mut self, state: &AppState) {
        for line in frame_lines(state, self.last.as_ref()) {
            if let Err(e) = writeln!(self.out, "{line}") {
                tracing::warn!(error = %e, "failed to write output");
                break;
            }
        }
        self.last = Some(state.clone());
    }
}

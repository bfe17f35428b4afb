use std::io::{self, Stdout};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Select, Text};
use weather_core::{
    Config, DisplayUnit, Phase, ProviderId, Widget,
    provider::{image_provider_from_config, weather_provider_from_config},
};

use crate::render::TerminalRenderer;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather lookup widget")]
pub struct Cli {
    /// Verbosity level (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, "openweather" or "giphy".
        provider: String,
    },

    /// Set the unit selected when a session starts.
    Unit {
        /// "c" or "f".
        unit: String,
    },

    /// Show weather for a location.
    Show {
        /// City, "city,state,country", or zip code.
        location: String,

        /// Unit to fetch in; defaults to the configured unit.
        #[arg(long)]
        unit: Option<String>,

        /// Also print the panes converted to the other unit.
        #[arg(long)]
        convert: bool,
    },

    /// Search and toggle units interactively.
    Interactive,
}

const ACTION_SEARCH: &str = "Search";
const ACTION_TOGGLE: &str = "Toggle unit";
const ACTION_QUIT: &str = "Quit";

type TerminalWidget = Widget<TerminalRenderer<Stdout>>;

fn build_widget(config: &Config, unit: DisplayUnit) -> anyhow::Result<TerminalWidget> {
    let weather = weather_provider_from_config(config)?;
    let images = image_provider_from_config(config)?;
    Ok(Widget::new(weather, images, TerminalRenderer::new(io::stdout()), unit))
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Unit { unit } => {
                let unit = DisplayUnit::try_from(unit.as_str())?;
                let mut config = Config::load()?;
                config.set_default_unit(unit);
                config.save()?;
                println!("Default unit set to {unit}");
                Ok(())
            }
            Command::Show { location, unit, convert } => {
                let config = Config::load()?;
                let unit = match unit {
                    Some(u) => DisplayUnit::try_from(u.as_str())?,
                    None => config.unit(),
                };

                let mut widget = build_widget(&config, unit)?;
                if widget.search(&location).await != Phase::Displayed {
                    anyhow::bail!("No weather to show for '{location}'");
                }

                if convert {
                    println!();
                    widget
                        .toggle_unit(unit.other())
                        .context("Failed to convert displayed temperatures")?;
                }
                Ok(())
            }
            Command::Interactive => interactive().await,
        }
    }
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load()?;

    let api_key = Password::new(&format!("API key for {id}:"))
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.upsert_provider_api_key(id, api_key);
    config.save()?;

    println!(
        "Saved {id} credentials to {}",
        Config::config_file_path()?.display()
    );
    Ok(())
}

/// `None` when the user pressed Esc, so the caller can go back a step.
fn unless_canceled<T>(answer: Result<T, InquireError>) -> Result<Option<T>, InquireError> {
    match answer {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled) => Ok(None),
        Err(e) => Err(e),
    }
}

async fn interactive() -> anyhow::Result<()> {
    let config = Config::load()?;
    let mut widget = build_widget(&config, config.unit())?;

    loop {
        let unit = widget.state().unit;
        let prompt = format!("[{}] What next?", unit.symbol());
        let action = unless_canceled(
            Select::new(&prompt, vec![ACTION_SEARCH, ACTION_TOGGLE, ACTION_QUIT]).prompt(),
        )
        .context("Failed to read action")?;

        match action {
            Some(ACTION_SEARCH) => {
                let location = unless_canceled(
                    Text::new("Location:")
                        .with_help_message("city / city,state,country / zipcode")
                        .prompt(),
                )
                .context("Failed to read location")?;

                if let Some(location) = location {
                    widget.search(&location).await;
                }
            }
            Some(ACTION_TOGGLE) => match widget.toggle_unit(unit.other()) {
                Ok(()) => println!("Unit: {}", widget.state().unit.symbol()),
                Err(e) => {
                    tracing::warn!(error = %e, "unit toggle failed");
                    println!("Could not convert displayed temperatures: {e}");
                }
            },
            _ => return Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_goes_back_instead_of_failing() {
        let answer: Result<String, InquireError> = Err(InquireError::OperationCanceled);
        assert!(unless_canceled(answer).unwrap().is_none());
    }

    #[test]
    fn answers_pass_through() {
        let answer: Result<&str, InquireError> = Ok(ACTION_TOGGLE);
        assert_eq!(unless_canceled(answer).unwrap(), Some(ACTION_TOGGLE));
    }

    #[test]
    fn interrupt_is_still_an_error() {
        let answer: Result<String, InquireError> = Err(InquireError::OperationInterrupted);
        assert!(matches!(
            unless_canceled(answer),
            Err(InquireError::OperationInterrupted)
        ));
    }
}

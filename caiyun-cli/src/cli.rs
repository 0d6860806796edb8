use anyhow::Context;
use caiyun_core::{ClientOption, Config, ForecastOverrides, Language, UnitSystem};
use clap::{ArgAction, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use tracing::{debug, info};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "caiyun", version, about = "Caiyun weather CLI")]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reply language, e.g. "en_US"; overrides the configured one.
    #[arg(long, global = true)]
    pub lang: Option<Language>,

    /// Unit system: "metric", "imperial" or "SI".
    #[arg(long, global = true)]
    pub unit: Option<UnitSystem>,

    /// Location as "longitude,latitude"; overrides the configured one.
    #[arg(long, global = true, value_name = "LON,LAT", allow_hyphen_values = true)]
    pub location: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API token, default location and preferences.
    Configure,

    /// Show current conditions.
    Realtime {
        /// Print the decoded reply as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the forecast.
    Forecast {
        /// Hourly steps (1-360); out-of-range values are clamped.
        #[arg(long, allow_negative_numbers = true)]
        hourly_steps: Option<i64>,

        /// Daily steps (1-15); out-of-range values are clamped.
        #[arg(long, allow_negative_numbers = true)]
        daily_steps: Option<i64>,

        /// Include weather alerts.
        #[arg(long)]
        alert: bool,

        /// Print the decoded reply as JSON.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        debug!(command = ?self.command, "running command");

        match self.command {
            Command::Configure => configure(),
            Command::Realtime { json } => {
                let client = self
                    .client_config()?
                    .client_builder()?
                    .options(self.extra_options())
                    .build();
                let reply = client.realtime().await.context("Realtime query failed")?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&reply)?);
                } else {
                    print!("{}", render::realtime(&reply)?);
                }
                Ok(())
            }
            Command::Forecast {
                hourly_steps,
                daily_steps,
                alert,
                json,
            } => {
                let client = self
                    .client_config()?
                    .client_builder()?
                    .options(self.extra_options())
                    .build();

                let mut overrides = ForecastOverrides::new()
                    .include_alerts(alert || client.config().forecast_defaults.include_alerts);
                if hourly_steps.is_some() {
                    overrides = overrides.hourly_steps(hourly_steps);
                }
                if daily_steps.is_some() {
                    overrides = overrides.daily_steps(daily_steps);
                }

                let reply = client
                    .forecast(Some(&overrides))
                    .await
                    .context("Forecast query failed")?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&reply)?);
                } else {
                    print!("{}", render::forecast(&reply)?);
                }
                Ok(())
            }
        }
    }

    /// Stored configuration with the `--location` override applied.
    fn client_config(&self) -> anyhow::Result<Config> {
        let path = Config::config_file_path()?;
        let mut cfg = Config::load_from(&path)?;
        debug!(path = %path.display(), "loaded configuration");

        if let Some(location) = &self.location {
            debug!(%location, "location overridden on the command line");
            cfg.location = Some(location.clone());
        }
        Ok(cfg)
    }

    /// Command-line options, applied after the stored ones so they win.
    fn extra_options(&self) -> Vec<ClientOption> {
        let mut options = Vec::new();
        if let Some(lang) = self.lang {
            options.push(ClientOption::language(lang));
        }
        if let Some(unit) = self.unit {
            options.push(ClientOption::unit(unit));
        }
        options
    }
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let token = Password::new("API token:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;
    if !token.trim().is_empty() {
        cfg.token = Some(token.trim().to_string());
    }

    let current_location = cfg.location.clone().unwrap_or_default();
    let location = Text::new("Location (longitude,latitude):")
        .with_default(&current_location)
        .prompt()?;
    cfg.location = Some(location.trim().to_string());

    let lang = Select::new("Language:", Language::all().to_vec())
        .with_starting_cursor(index_of(Language::all(), cfg.lang.unwrap_or_default()))
        .prompt()?;
    cfg.lang = Some(lang);

    let unit = Select::new("Unit system:", UnitSystem::all().to_vec())
        .with_starting_cursor(index_of(UnitSystem::all(), cfg.unit.unwrap_or_default()))
        .prompt()?;
    cfg.unit = Some(unit);

    let path = cfg.save()?;
    info!(path = %path.display(), "configuration saved");
    println!("Configuration saved to {}", path.display());

    Ok(())
}

fn index_of<T: PartialEq>(all: &[T], value: T) -> usize {
    all.iter().position(|v| *v == value).unwrap_or(0)
}

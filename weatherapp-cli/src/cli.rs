use std::sync::Arc;

use anyhow::{Context, anyhow};
use chrono::Local;
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, Password, PasswordDisplayMode};
use weatherapp_core::{ApiKey, Config, Coordinates, FixedLocation, OpenWeatherClient, WeatherStore};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weatherapp",
    version,
    about = "Current weather and 3-hour forecast for your location"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and, optionally, a fixed location.
    Configure,

    /// Show current conditions and the short-term forecast.
    Show {
        /// Latitude; overrides the configured location.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude; overrides the configured location.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Number of 3-hour forecast steps to request.
        #[arg(long)]
        count: Option<u32>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { lat, lon, count } => show(lat.zip(lon), count).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let key = ApiKey::new(key.trim());
    if key.is_empty() {
        return Err(anyhow!("API key must not be empty."));
    }
    cfg.set_api_key(key);

    let fixed = Confirm::new("Set a fixed location?")
        .with_default(cfg.location.is_some())
        .prompt()
        .context("Failed to read answer")?;

    if fixed {
        let latitude = CustomType::<f64>::new("Latitude:")
            .with_error_message("Please type a number, e.g. 37.7749")
            .prompt()
            .context("Failed to read latitude")?;
        let longitude = CustomType::<f64>::new("Longitude:")
            .with_error_message("Please type a number, e.g. -122.4194")
            .prompt()
            .context("Failed to read longitude")?;

        cfg.set_location(Coordinates::new(latitude, longitude)?);
    }

    let path = cfg.save()?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}

async fn show(coords: Option<(f64, f64)>, count: Option<u32>) -> anyhow::Result<()> {
    let cfg = Config::load()?;
    let api_key = cfg.api_key()?.clone();

    let coords = match coords {
        Some((lat, lon)) => Some(Coordinates::new(lat, lon)?),
        None => cfg.coordinates()?,
    };
    let location = FixedLocation::from(coords);

    let client = OpenWeatherClient::new()?;
    let store = WeatherStore::new(Arc::new(client), Arc::new(cfg.probe()))
        .with_forecast_count(count.unwrap_or_else(|| cfg.forecast_count()));

    let current = store.subscribe_current_weather();
    let forecast = store.subscribe_forecast();

    let pending = store.refresh_from(&location, api_key).await.ok_or_else(|| {
        anyhow!(
            "No location available.\n\
             Hint: pass --lat and --lon, or run `weatherapp configure` to set a fixed location."
        )
    })?;
    pending.join().await;

    let today = Local::now().date_naive();
    println!("{}", render::current_weather(&current.borrow(), today));
    println!();
    println!("{}", render::forecast(&forecast.borrow()));

    Ok(())
}

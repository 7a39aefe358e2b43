//! Core library for the `weatherapp` CLI.
//!
//! This crate defines:
//! - Domain models and the `UiState` projection of fetch progress
//! - The OpenWeather client behind the `WeatherClient` trait
//! - `WeatherStore`, which publishes current weather and forecast as two
//!   independently observable slots
//! - Connectivity probe and location provider collaborators
//! - Configuration & credentials handling
//!
//! It is used by `weatherapp-cli`, but can also be embedded by other hosts.

pub mod client;
pub mod config;
pub mod location;
pub mod model;
pub mod probe;
pub mod store;

pub use client::{DEFAULT_FORECAST_COUNT, OpenWeatherClient, WeatherClient};
pub use config::{Config, LocationConfig, ProbeConfig};
pub use location::{FixedLocation, LocationProvider};
pub use model::{
    ApiKey, Coordinates, CurrentWeather, ErrorKind, Forecast, ForecastEntry, UiState,
};
pub use probe::{AlwaysOnline, ConnectivityProbe, TcpProbe};
pub use store::{PendingRequests, WeatherStore};

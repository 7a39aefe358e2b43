use async_trait::async_trait;
use std::fmt::Debug;

use crate::model::{ApiKey, Coordinates, CurrentWeather, ErrorKind, Forecast};

pub mod openweather;

pub use openweather::OpenWeatherClient;

/// Number of 3-hour forecast steps requested when the caller does not say otherwise.
pub const DEFAULT_FORECAST_COUNT: u32 = 6;

/// Remote source of current conditions and forecasts.
///
/// Implementations never distinguish "offline" from "server error": every
/// failure is `ErrorKind::ApiError`. Connectivity gating happens in the store.
#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    async fn fetch_current_weather(
        &self,
        coords: Coordinates,
        api_key: &ApiKey,
    ) -> Result<CurrentWeather, ErrorKind>;

    /// `count` is passed through as the upstream `cnt` parameter, unvalidated.
    async fn fetch_forecast(
        &self,
        coords: Coordinates,
        api_key: &ApiKey,
        count: u32,
    ) -> Result<Forecast, ErrorKind>;
}

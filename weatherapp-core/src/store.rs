//! Weather store: owns the two observable state slots and drives the client.
//!
//! Each slot is a `tokio::sync::watch` channel starting at `UiState::Loading`.
//! Requests run as independent tokio tasks; a slot only changes when a request
//! for it completes, and the last request to complete wins.

use std::sync::Arc;
use tokio::{sync::watch, task::JoinHandle};
use tracing::instrument;

use crate::{
    client::{DEFAULT_FORECAST_COUNT, WeatherClient},
    location::LocationProvider,
    model::{ApiKey, Coordinates, CurrentWeather, ErrorKind, Forecast, UiState},
    probe::ConnectivityProbe,
};

#[derive(Debug, Clone)]
pub struct WeatherStore {
    client: Arc<dyn WeatherClient>,
    probe: Arc<dyn ConnectivityProbe>,
    forecast_count: u32,
    current_weather: Arc<watch::Sender<UiState<CurrentWeather>>>,
    forecast: Arc<watch::Sender<UiState<Forecast>>>,
}

/// Handles of the tasks spawned by [`WeatherStore::refresh`].
///
/// Dropping this does not cancel anything.
#[derive(Debug)]
pub struct PendingRequests {
    pub current_weather: JoinHandle<()>,
    pub forecast: JoinHandle<()>,
}

impl PendingRequests {
    /// Wait for both requests to publish.
    pub async fn join(self) {
        let (current, forecast) = tokio::join!(self.current_weather, self.forecast);
        for res in [current, forecast] {
            if let Err(e) = res {
                tracing::error!(error = %e, "weather request task failed");
            }
        }
    }
}

impl WeatherStore {
    pub fn new(client: Arc<dyn WeatherClient>, probe: Arc<dyn ConnectivityProbe>) -> Self {
        let (current_weather, _) = watch::channel(UiState::Loading);
        let (forecast, _) = watch::channel(UiState::Loading);

        Self {
            client,
            probe,
            forecast_count: DEFAULT_FORECAST_COUNT,
            current_weather: Arc::new(current_weather),
            forecast: Arc::new(forecast),
        }
    }

    /// Number of 3-hour steps requested by forecast fetches.
    pub fn with_forecast_count(mut self, count: u32) -> Self {
        self.forecast_count = count;
        self
    }

    pub fn forecast_count(&self) -> u32 {
        self.forecast_count
    }

    pub fn subscribe_current_weather(&self) -> watch::Receiver<UiState<CurrentWeather>> {
        self.current_weather.subscribe()
    }

    pub fn subscribe_forecast(&self) -> watch::Receiver<UiState<Forecast>> {
        self.forecast.subscribe()
    }

    /// Latest state of the current-weather slot.
    pub fn current_weather(&self) -> UiState<CurrentWeather> {
        self.current_weather.borrow().clone()
    }

    /// Latest state of the forecast slot.
    pub fn forecast(&self) -> UiState<Forecast> {
        self.forecast.borrow().clone()
    }

    /// Fetch current weather and publish the outcome. Returns what was published.
    #[instrument(level = "debug", skip_all, fields(coords = %coords))]
    pub async fn load_current_weather(
        &self,
        coords: Coordinates,
        api_key: &ApiKey,
    ) -> UiState<CurrentWeather> {
        let state: UiState<CurrentWeather> = if !self.probe.is_online().await {
            tracing::debug!("offline, skipping current weather fetch");
            UiState::Error(ErrorKind::NoInternet)
        } else {
            self.client.fetch_current_weather(coords, api_key).await.into()
        };

        log_outcome("current_weather", &state);
        self.current_weather.send_replace(state.clone());
        state
    }

    /// Fetch the forecast and publish the outcome. Returns what was published.
    #[instrument(level = "debug", skip_all, fields(coords = %coords, count = self.forecast_count))]
    pub async fn load_forecast(&self, coords: Coordinates, api_key: &ApiKey) -> UiState<Forecast> {
        let state: UiState<Forecast> = if !self.probe.is_online().await {
            tracing::debug!("offline, skipping forecast fetch");
            UiState::Error(ErrorKind::NoInternet)
        } else {
            self.client
                .fetch_forecast(coords, api_key, self.forecast_count)
                .await
                .into()
        };

        log_outcome("forecast", &state);
        self.forecast.send_replace(state.clone());
        state
    }

    /// Spawn a current-weather fetch as an independent task.
    pub fn request_current_weather(&self, coords: Coordinates, api_key: ApiKey) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            store.load_current_weather(coords, &api_key).await;
        })
    }

    /// Spawn a forecast fetch as an independent task.
    pub fn request_forecast(&self, coords: Coordinates, api_key: ApiKey) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            store.load_forecast(coords, &api_key).await;
        })
    }

    /// Request both slots for one position.
    pub fn refresh(&self, coords: Coordinates, api_key: ApiKey) -> PendingRequests {
        PendingRequests {
            current_weather: self.request_current_weather(coords, api_key.clone()),
            forecast: self.request_forecast(coords, api_key),
        }
    }

    /// Ask `location` for a fix and request both slots for it.
    ///
    /// Without a fix nothing is requested and both slots keep their state.
    pub async fn refresh_from(
        &self,
        location: &dyn LocationProvider,
        api_key: ApiKey,
    ) -> Option<PendingRequests> {
        match location.locate().await {
            Some(coords) => Some(self.refresh(coords, api_key)),
            None => {
                tracing::info!("no location fix available, weather not requested");
                None
            }
        }
    }
}

fn log_outcome<T>(slot: &'static str, state: &UiState<T>) {
    match state {
        UiState::Loaded(_) => tracing::debug!(slot, "fetch succeeded"),
        // Client failures are already logged at warn with their cause.
        UiState::Error(kind) => tracing::debug!(slot, error = %kind, "fetch failed"),
        UiState::Loading => {}
    }
}

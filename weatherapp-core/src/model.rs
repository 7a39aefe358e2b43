use anyhow::{Result, anyhow};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Format of `ForecastEntry::timestamp`, as sent by the upstream API.
pub const FORECAST_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const ICON_BASE_URL: &str = "http://openweathermap.org/img/wn";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let coords = Self { latitude, longitude };
        if !coords.is_finite() {
            return Err(anyhow!(
                "Invalid coordinates: lat={latitude}, lon={longitude}. Both must be finite numbers."
            ));
        }
        Ok(coords)
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

/// Opaque API credential. Never printed: `Debug` is redacted and there is no `Display`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Raw key, for placing into the outgoing request only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub location_name: String,
    pub temperature_celsius: f64,
    pub condition_icon_id: String,
}

impl CurrentWeather {
    pub fn icon_url(&self) -> String {
        format!("{ICON_BASE_URL}/{}@2x.png", self.condition_icon_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// `yyyy-MM-dd HH:mm:ss`, kept verbatim.
    pub timestamp: String,
    pub temperature_celsius: f64,
    pub condition_icon_id: String,
}

impl ForecastEntry {
    /// Parsed `timestamp`, or `None` if the server sent an unexpected format.
    pub fn time(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.timestamp, FORECAST_TIME_FORMAT).ok()
    }

    pub fn icon_url(&self) -> String {
        format!("{ICON_BASE_URL}/{}@4x.png", self.condition_icon_id)
    }
}

/// Forecast entries in server order (chronological); never re-sorted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Forecast {
    pub entries: Vec<ForecastEntry>,
}

impl Forecast {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// User-facing failure categories. `Display` is the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ErrorKind {
    #[error("No internet connection")]
    NoInternet,
    #[error("Something went wrong, please try again later")]
    ApiError,
}

/// Fetch progress of one state slot.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UiState<T> {
    #[default]
    Loading,
    Loaded(T),
    Error(ErrorKind),
}

impl<T> UiState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, UiState::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            UiState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<ErrorKind> {
        match self {
            UiState::Error(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl<T> From<Result<T, ErrorKind>> for UiState<T> {
    fn from(result: Result<T, ErrorKind>) -> Self {
        match result {
            Ok(value) => UiState::Loaded(value),
            Err(kind) => UiState::Error(kind),
        }
    }
}

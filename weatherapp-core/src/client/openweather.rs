use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;

use crate::model::{ApiKey, Coordinates, CurrentWeather, ErrorKind, Forecast, ForecastEntry};

use super::WeatherClient;

pub const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(60);
const READ_TIMEOUT: Duration = Duration::from_secs(100);

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(OPENWEATHER_BASE_URL)
    }

    /// Client against another server speaking the same API (mirrors, test servers).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .read_timeout(READ_TIMEOUT)
            .build()
            .context("Failed to build HTTP client for OpenWeather")?;

        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), name)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        name: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let res = self
            .http
            .get(self.endpoint(name))
            .query(query)
            .send()
            .await
            // The URL carries `appid`; keep it out of error messages.
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("Failed to send request to OpenWeather ({name})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("Failed to read OpenWeather {name} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather {} request failed with status {}: {}",
                name,
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body).with_context(|| format!("Failed to parse OpenWeather {name} JSON"))
    }

    async fn current(&self, coords: Coordinates, api_key: &ApiKey) -> Result<CurrentWeather> {
        let parsed: OwCurrentResponse = self
            .get_json("weather", &base_query(coords, api_key)?)
            .await?;

        parsed.try_into()
    }

    async fn forecast(&self, coords: Coordinates, api_key: &ApiKey, count: u32) -> Result<Forecast> {
        let mut query = base_query(coords, api_key)?;
        query.push(("cnt", count.to_string()));

        let parsed: OwForecastResponse = self.get_json("forecast", &query).await?;

        parsed.try_into()
    }
}

#[async_trait]
impl WeatherClient for OpenWeatherClient {
    async fn fetch_current_weather(
        &self,
        coords: Coordinates,
        api_key: &ApiKey,
    ) -> Result<CurrentWeather, ErrorKind> {
        self.current(coords, api_key).await.map_err(|err| {
            tracing::warn!(error = ?err, %coords, "current weather fetch failed");
            ErrorKind::ApiError
        })
    }

    async fn fetch_forecast(
        &self,
        coords: Coordinates,
        api_key: &ApiKey,
        count: u32,
    ) -> Result<Forecast, ErrorKind> {
        self.forecast(coords, api_key, count).await.map_err(|err| {
            tracing::warn!(error = ?err, %coords, count, "forecast fetch failed");
            ErrorKind::ApiError
        })
    }
}

fn base_query(coords: Coordinates, api_key: &ApiKey) -> Result<Vec<(&'static str, String)>> {
    if !coords.is_finite() {
        return Err(anyhow!("Refusing to query OpenWeather with non-finite coordinates {coords}"));
    }

    Ok(vec![
        ("lat", coords.latitude.to_string()),
        ("lon", coords.longitude.to_string()),
        ("appid", api_key.expose().to_string()),
        ("units", "metric".to_string()),
    ])
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

fn first_icon(weather: Vec<OwWeather>) -> Result<String> {
    weather
        .into_iter()
        .next()
        .map(|w| w.icon)
        .ok_or_else(|| anyhow!("OpenWeather response contained no weather condition"))
}

impl TryFrom<OwCurrentResponse> for CurrentWeather {
    type Error = anyhow::Error;

    fn try_from(parsed: OwCurrentResponse) -> Result<Self> {
        Ok(CurrentWeather {
            condition_icon_id: first_icon(parsed.weather)?,
            location_name: parsed.name,
            temperature_celsius: parsed.main.temp,
        })
    }
}

impl TryFrom<OwForecastResponse> for Forecast {
    type Error = anyhow::Error;

    fn try_from(parsed: OwForecastResponse) -> Result<Self> {
        let entries = parsed
            .list
            .into_iter()
            .map(|entry| {
                Ok(ForecastEntry {
                    condition_icon_id: first_icon(entry.weather)
                        .with_context(|| format!("Forecast entry {}", entry.dt_txt))?,
                    timestamp: entry.dt_txt,
                    temperature_celsius: entry.main.temp,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Forecast { entries })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

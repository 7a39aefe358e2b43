use chrono::NaiveDate;
use weatherapp_core::{CurrentWeather, Forecast, UiState};

const DEGREES: &str = "\u{2103}";

/// Whole degrees, truncated toward zero.
fn whole_degrees(celsius: f64) -> i64 {
    celsius as i64
}

pub fn current_weather(state: &UiState<CurrentWeather>, today: NaiveDate) -> String {
    match state {
        UiState::Loading => "Loading current weather...".to_string(),
        UiState::Error(kind) => format!("Current weather unavailable: {kind}"),
        UiState::Loaded(weather) => format!(
            "Today, {}\n{}\n{}{DEGREES}\n{}",
            today.format("%d %b %Y"),
            weather.location_name,
            whole_degrees(weather.temperature_celsius),
            weather.icon_url(),
        ),
    }
}

pub fn forecast(state: &UiState<Forecast>) -> String {
    match state {
        UiState::Loading => "Loading forecast...".to_string(),
        UiState::Error(kind) => format!("Forecast unavailable: {kind}"),
        UiState::Loaded(forecast) if forecast.is_empty() => "3 hour forecast: no entries".to_string(),
        UiState::Loaded(forecast) => {
            let mut out = String::from("3 hour forecast");
            for entry in &forecast.entries {
                let when = entry
                    .time()
                    .map(|t| t.format("%d %b, %H:%M").to_string())
                    .unwrap_or_else(|| entry.timestamp.clone());
                out.push_str(&format!(
                    "\n  {when:<14} {:>4}{DEGREES}  {}",
                    whole_degrees(entry.temperature_celsius),
                    entry.icon_url(),
                ));
            }
            out
        }
    }
}

//! End-to-end tests: WeatherStore driving OpenWeatherClient against a mock server.

use std::sync::Arc;

use async_trait::async_trait;
use weatherapp_core::{
    AlwaysOnline, ApiKey, ConnectivityProbe, Coordinates, CurrentWeather, ErrorKind,
    OpenWeatherClient, UiState, WeatherStore,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug)]
struct Offline;

#[async_trait]
impl ConnectivityProbe for Offline {
    async fn is_online(&self) -> bool {
        false
    }
}

fn store_for(server: &MockServer, probe: Arc<dyn ConnectivityProbe>) -> WeatherStore {
    let client = OpenWeatherClient::with_base_url(server.uri()).unwrap();
    WeatherStore::new(Arc::new(client), probe)
}

#[tokio::test]
async fn san_francisco_scenario_loads_current_weather() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("lat", "37.7749"))
        .and(query_param("lon", "-122.4194"))
        .and(query_param("appid", "abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "San Francisco",
            "main": { "temp": 18.5 },
            "weather": [ { "icon": "01d" } ]
        })))
        .mount(&server)
        .await;

    let store = store_for(&server, Arc::new(AlwaysOnline));
    let mut rx = store.subscribe_current_weather();
    assert!(rx.borrow().is_loading());

    store
        .request_current_weather(Coordinates::new(37.7749, -122.4194).unwrap(), ApiKey::new("abc123"))
        .await
        .unwrap();

    rx.changed().await.unwrap();
    assert_eq!(
        *rx.borrow(),
        UiState::Loaded(CurrentWeather {
            location_name: "San Francisco".to_string(),
            temperature_celsius: 18.5,
            condition_icon_id: "01d".to_string(),
        })
    );
}

#[tokio::test]
async fn api_failure_on_one_slot_leaves_the_other_loaded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("cnt", "6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "list": [
                {
                    "dt_txt": "2023-03-14 15:00:00",
                    "main": { "temp": 14.0 },
                    "weather": [ { "icon": "01d" } ]
                },
                {
                    "dt_txt": "2023-03-14 18:00:00",
                    "main": { "temp": 12.0 },
                    "weather": [ { "icon": "02n" } ]
                }
            ]
        })))
        .mount(&server)
        .await;

    let store = store_for(&server, Arc::new(AlwaysOnline));
    store
        .refresh(Coordinates::new(48.8566, 2.3522).unwrap(), ApiKey::new("abc123"))
        .join()
        .await;

    assert_eq!(store.current_weather(), UiState::Error(ErrorKind::ApiError));
    let forecast = store.forecast();
    let entries = &forecast.loaded().expect("forecast should be loaded").entries;
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].timestamp, "2023-03-14 15:00:00");
    assert_eq!(entries[1].timestamp, "2023-03-14 18:00:00");
}

#[tokio::test]
async fn offline_store_never_contacts_the_server() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = store_for(&server, Arc::new(Offline));
    store
        .refresh(Coordinates::new(0.0, 0.0).unwrap(), ApiKey::new("abc123"))
        .join()
        .await;

    assert_eq!(store.current_weather(), UiState::Error(ErrorKind::NoInternet));
    assert_eq!(store.forecast(), UiState::Error(ErrorKind::NoInternet));
}

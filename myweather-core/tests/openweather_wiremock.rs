//! OpenWeather provider and session against a mock HTTP server.

use myweather_core::{
    AuthorizationStatus, Coordinate, FetchError, OpenWeatherProvider, Prompt,
    SimulatedLocationService, WeatherCell, WeatherDisplay, WeatherFetcher, WeatherProvider,
    WeatherRecord, WeatherSession,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn seoul_response() -> serde_json::Value {
    serde_json::json!({
        "coord": {"lon": 126.8865, "lat": 37.5177},
        "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
        "main": {
            "temp": 21.5,
            "feels_like": 20.0,
            "temp_min": 18.0,
            "temp_max": 24.0,
            "pressure": 1015,
            "humidity": 55
        },
        "wind": {"speed": 3.2, "deg": 250},
        "name": "Seoul",
        "cod": 200
    })
}

fn fallback() -> Coordinate {
    Coordinate::new(37.517742, 126.886463).unwrap()
}

fn provider_for(server: &MockServer) -> OpenWeatherProvider {
    OpenWeatherProvider::new("TEST_KEY".into(), format!("{}/data/2.5/weather", server.uri()))
}

#[tokio::test]
async fn sends_fixed_query_and_decodes_record() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "37.517742"))
        .and(query_param("lon", "126.886463"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("exclude", "current"))
        .and(query_param("units", "metric"))
        .and(query_param("lang", "kr"))
        .respond_with(ResponseTemplate::new(200).set_body_json(seoul_response()))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let record = provider.current_weather(fallback()).await.unwrap();

    assert_eq!(record.location_name, "Seoul");
    assert_eq!(record.temperature_c, 21.5);
    assert_eq!(record.temp_min_c, 18.0);
    assert_eq!(record.temp_max_c, 24.0);
    assert_eq!(record.feels_like_c, 20.0);
    assert_eq!(record.humidity_pct, 55.0);
    assert_eq!(record.wind_speed_mps, 3.2);
    assert_eq!(record.description, "clear sky");
    assert_eq!(record.icon, "01d");
    assert_eq!(record.icon_url, "https://openweathermap.org/img/wn/01d@2x.png");
}

#[tokio::test]
async fn non_success_status_is_typed_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string(r#"{"cod":401,"message":"Invalid API key"}"#),
        )
        .mount(&server)
        .await;

    let err = provider_for(&server).current_weather(fallback()).await.unwrap_err();

    match err {
        FetchError::Status { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("Invalid API key"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn invalid_json_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = provider_for(&server).current_weather(fallback()).await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test]
async fn network_error_keeps_previous_record() {
    // A bare (non-pooled) server really shuts down when dropped.
    let server = MockServer::builder().start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(seoul_response()))
        .mount(&server)
        .await;

    let mut fetcher = WeatherFetcher::new(provider_for(&server));
    let mut cell = WeatherCell::new();
    assert!(fetcher.fetch(fallback(), &mut cell).await.is_rendered());
    let before = cell.get().cloned();

    // Nothing listens on the old address once the server is dropped.
    let dead_uri = server.uri();
    drop(server);
    let mut dead = WeatherFetcher::new(OpenWeatherProvider::new("TEST_KEY".into(), dead_uri));

    let outcome = dead.fetch(fallback(), &mut cell).await;
    assert!(!outcome.is_rendered());
    assert_eq!(cell.get().cloned(), before);
}

#[derive(Debug, Default)]
struct Screen {
    rendered: Vec<WeatherRecord>,
    prompts: Vec<Prompt>,
}

impl WeatherDisplay for Screen {
    fn render(&mut self, record: &WeatherRecord) {
        self.rendered.push(record.clone());
    }

    fn prompt(&mut self, prompt: Prompt) {
        self.prompts.push(prompt);
    }
}

#[tokio::test]
async fn denied_session_renders_fallback_weather() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("lat", "37.517742"))
        .and(query_param("lon", "126.886463"))
        .respond_with(ResponseTemplate::new(200).set_body_json(seoul_response()))
        .expect(1)
        .mount(&server)
        .await;

    let device = Coordinate::new(35.1796, 129.0756).unwrap();
    let service = SimulatedLocationService::new(AuthorizationStatus::NotDetermined, device)
        .with_grant(AuthorizationStatus::Denied);
    let mut session = WeatherSession::new(service, provider_for(&server), fallback());
    let mut screen = Screen::default();

    session.start(&mut screen).await;
    session.drain_events(&mut screen).await;

    assert_eq!(screen.rendered.len(), 1);
    assert_eq!(screen.rendered[0].location_name, "Seoul");
    assert!(screen.prompts.is_empty());
}

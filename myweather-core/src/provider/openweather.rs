use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{
    Config,
    error::{FetchError, truncate_body},
    model::{Coordinate, WeatherRecord, icon_url},
};

use super::WeatherProvider;

/// OpenWeather "current weather" client.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    icon_url_template: String,
    units: String,
    lang: String,
    exclude: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn from_config(config: &Config, api_key: String) -> Self {
        Self {
            api_key,
            base_url: config.base_url.clone(),
            icon_url_template: config.icon_url_template.clone(),
            units: config.units.clone(),
            lang: config.lang.clone(),
            exclude: config.exclude.clone(),
            http: Client::new(),
        }
    }

    /// Provider with default settings pointed at `base_url`.
    pub fn new(api_key: String, base_url: impl Into<String>) -> Self {
        let config = Config { base_url: base_url.into(), ..Config::default() };
        Self::from_config(&config, api_key)
    }

    /// Query parameters for one request, in the order they are sent.
    pub fn query_params(&self, coordinate: Coordinate) -> Vec<(&'static str, String)> {
        vec![
            ("lat", coordinate.lat().to_string()),
            ("lon", coordinate.lon().to_string()),
            ("appid", self.api_key.clone()),
            ("exclude", self.exclude.clone()),
            ("units", self.units.clone()),
            ("lang", self.lang.clone()),
        ]
    }

    /// Decode a response body into a record.
    pub fn decode(&self, body: &str) -> Result<WeatherRecord, FetchError> {
        let parsed: OwCurrentResponse = serde_json::from_str(body)?;

        let condition = parsed.weather.into_iter().next().ok_or(FetchError::MissingCondition)?;
        let icon_url = icon_url(&self.icon_url_template, &condition.icon)?;

        Ok(WeatherRecord {
            location_name: parsed.name,
            temperature_c: parsed.main.temp,
            temp_min_c: parsed.main.temp_min,
            temp_max_c: parsed.main.temp_max,
            feels_like_c: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            wind_speed_mps: parsed.wind.speed,
            description: condition.description,
            icon: condition.icon,
            icon_url,
            fetched_at: Utc::now(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
    feels_like: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self))]
    async fn current_weather(&self, coordinate: Coordinate) -> Result<WeatherRecord, FetchError> {
        let res = self
            .http
            .get(&self.base_url)
            .query(&self.query_params(coordinate))
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        debug!(%status, bytes = body.len(), "OpenWeather responded");

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        self.decode(&body)
    }
}
